//! In-process stand-in for the store.
//!
//! `FakeStore` is a `Transport`: bytes the client writes are parsed as
//! request frames and answered from a small in-memory graph. Reads hand back
//! at most 1, 2 or 3 bytes at a time (cycling) so every test also exercises
//! reassembly of partial reads.
//!
//! The client owns its transport, so `FakeStore` is a cheap handle over
//! shared state: keep a clone to inspect the store after `shutdown`.

#![allow(dead_code)]

use sctp_client::{
    CommandCode, EventType, Pattern, PayloadReader, PayloadWriter, RequestHeader, ResponseHeader,
    ResultCode, ScAddr, ScType, StatSample, Transport,
};
use std::cell::{RefCell, RefMut};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Read, Write};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub ty: ScType,
    pub begin: ScAddr,
    pub end: ScAddr,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct StoreState {
    inbox: Vec<u8>,
    outbox: VecDeque<u8>,
    read_sizes: Vec<usize>,
    read_idx: usize,
    /// Raw frames served instead of computed answers, in order.
    canned: VecDeque<Vec<u8>>,
    pub requests: Vec<(RequestHeader, Vec<u8>)>,
    pub elements: BTreeMap<ScAddr, Element>,
    pub idtfs: BTreeMap<String, ScAddr>,
    pub stats: Vec<StatSample>,
    pub events: BTreeMap<u32, (EventType, ScAddr)>,
    next_offset: u16,
    next_event: u32,
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct FakeStore {
    state: Rc<RefCell<StoreState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                read_sizes: vec![1, 2, 3],
                next_offset: 1,
                next_event: 100,
                ..StoreState::default()
            })),
        }
    }

    pub fn state(&self) -> RefMut<'_, StoreState> {
        self.state.borrow_mut()
    }
}

impl StoreState {
    /// Serve `frame` verbatim for the next request.
    pub fn push_canned(&mut self, frame: Vec<u8>) {
        self.canned.push_back(frame);
    }

    /// Named node, created directly in the store.
    pub fn add_named_node(&mut self, idtf: &str) -> ScAddr {
        let addr = self.alloc(ScType::NODE_CONST, ScAddr::EMPTY, ScAddr::EMPTY);
        self.idtfs.insert(idtf.to_string(), addr);
        addr
    }

    /// Payloads of every request sent with `command`.
    pub fn payloads(&self, command: CommandCode) -> Vec<Vec<u8>> {
        self.requests
            .iter()
            .filter(|(h, _)| h.command == command)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn arcs(&self) -> Vec<(ScAddr, &Element)> {
        self.elements
            .iter()
            .filter(|(_, e)| e.ty.is_arc())
            .map(|(a, e)| (*a, e))
            .collect()
    }

    fn alloc(&mut self, ty: ScType, begin: ScAddr, end: ScAddr) -> ScAddr {
        let addr = ScAddr::new(1, self.next_offset);
        self.next_offset += 1;
        self.elements.insert(
            addr,
            Element {
                ty,
                begin,
                end,
                content: Vec::new(),
            },
        );
        addr
    }

    fn process(&mut self) {
        loop {
            let Ok(header) = RequestHeader::from_bytes(&self.inbox) else {
                return;
            };
            let total = 10 + header.payload_len as usize;
            if self.inbox.len() < total {
                return;
            }
            let payload = self.inbox[10..total].to_vec();
            self.inbox.drain(..total);
            self.requests.push((header, payload.clone()));

            let frame = match self.canned.pop_front() {
                Some(frame) => frame,
                None => {
                    let (result, body) = self.answer(header.command, &payload);
                    let mut frame =
                        ResponseHeader::new(header.command, result, body.len() as u32)
                            .to_bytes()
                            .to_vec();
                    frame.extend_from_slice(&body);
                    frame
                }
            };
            self.outbox.extend(frame);
        }
    }

    fn answer(&mut self, command: CommandCode, payload: &[u8]) -> (ResultCode, Vec<u8>) {
        let mut r = PayloadReader::new(payload);
        let mut w = PayloadWriter::new();
        let ok = |w: PayloadWriter| (ResultCode::Ok, w.into_bytes());
        let fail = (ResultCode::Fail, Vec::new());
        let missing = (ResultCode::NoElement, Vec::new());

        match command {
            CommandCode::CheckElement => match r.addr() {
                Ok(a) if self.elements.contains_key(&a) => ok(w),
                _ => missing,
            },
            CommandCode::GetElementType => match r.addr().ok().and_then(|a| self.elements.get(&a)) {
                Some(e) => {
                    w.sc_type(e.ty);
                    ok(w)
                }
                None => missing,
            },
            CommandCode::EraseElement => match r.addr().ok().and_then(|a| self.elements.remove(&a)) {
                Some(_) => ok(w),
                None => missing,
            },
            CommandCode::CreateNode => match r.sc_type() {
                Ok(ty) => {
                    let addr = self.alloc(ty, ScAddr::EMPTY, ScAddr::EMPTY);
                    w.addr(addr);
                    ok(w)
                }
                Err(_) => fail,
            },
            CommandCode::CreateLink => {
                let addr = self.alloc(ScType::LINK, ScAddr::EMPTY, ScAddr::EMPTY);
                w.addr(addr);
                ok(w)
            }
            CommandCode::CreateArc => {
                let (Ok(ty), Ok(begin), Ok(end)) = (r.sc_type(), r.addr(), r.addr()) else {
                    return fail;
                };
                if !self.elements.contains_key(&begin) || !self.elements.contains_key(&end) {
                    return missing;
                }
                let addr = self.alloc(ty, begin, end);
                w.addr(addr);
                ok(w)
            }
            CommandCode::GetArc => match r.addr().ok().and_then(|a| self.elements.get(&a)) {
                Some(e) if e.ty.is_arc() => {
                    w.addr(e.begin).addr(e.end);
                    ok(w)
                }
                _ => missing,
            },
            CommandCode::GetLinkContent => match r.addr().ok().and_then(|a| self.elements.get(&a)) {
                Some(e) if e.ty.is_link() => (ResultCode::Ok, e.content.clone()),
                _ => missing,
            },
            CommandCode::SetLinkContent => {
                let (Ok(addr), Ok(content)) = (r.addr(), r.bytes_prefixed()) else {
                    return fail;
                };
                match self.elements.get_mut(&addr) {
                    Some(e) if e.ty.is_link() => {
                        e.content = content.to_vec();
                        ok(w)
                    }
                    _ => missing,
                }
            }
            CommandCode::FindLinks => {
                let Ok(content) = r.bytes_prefixed() else {
                    return fail;
                };
                let found: Vec<ScAddr> = self
                    .elements
                    .iter()
                    .filter(|(_, e)| e.ty.is_link() && e.content == content)
                    .map(|(a, _)| *a)
                    .collect();
                w.u32(found.len() as u32);
                for a in found {
                    w.addr(a);
                }
                ok(w)
            }
            CommandCode::IterateElements => {
                let Ok(pattern) = Pattern::decode(&mut r) else {
                    return fail;
                };
                let matches = self.matches(&pattern);
                w.u32(matches.len() as u32);
                for m in matches {
                    for a in m {
                        w.addr(a);
                    }
                }
                ok(w)
            }
            CommandCode::FindElementBySysIdtf => {
                let Ok(idtf) = r.bytes_prefixed() else {
                    return fail;
                };
                let idtf = String::from_utf8_lossy(idtf).into_owned();
                match self.idtfs.get(&idtf) {
                    Some(a) => {
                        w.addr(*a);
                        ok(w)
                    }
                    None => missing,
                }
            }
            CommandCode::SetSysIdtf => {
                let (Ok(addr), Ok(idtf)) = (r.addr(), r.bytes_prefixed()) else {
                    return fail;
                };
                if !self.elements.contains_key(&addr) {
                    return missing;
                }
                self.idtfs
                    .insert(String::from_utf8_lossy(idtf).into_owned(), addr);
                ok(w)
            }
            CommandCode::Statistics => {
                let (Ok(begin), Ok(end)) = (r.u64(), r.u64()) else {
                    return fail;
                };
                let samples: Vec<StatSample> = self
                    .stats
                    .iter()
                    .filter(|s| s.time >= begin && s.time <= end)
                    .copied()
                    .collect();
                w.u32(samples.len() as u32);
                for s in samples {
                    w.u64(s.time)
                        .u64(s.node_count)
                        .u64(s.arc_count)
                        .u64(s.link_count)
                        .u64(s.live_node_count)
                        .u64(s.live_arc_count)
                        .u64(s.live_link_count)
                        .u64(s.empty_count)
                        .u64(s.connection_count)
                        .u64(s.command_count)
                        .u64(s.command_error_count)
                        .u8(u8::from(s.is_initial));
                }
                ok(w)
            }
            CommandCode::EventCreate => {
                let (Ok(ty), Ok(addr)) = (r.u8(), r.addr()) else {
                    return fail;
                };
                let Some(ty) = EventType::from_u8(ty) else {
                    return fail;
                };
                if !self.elements.contains_key(&addr) {
                    return missing;
                }
                let id = self.next_event;
                self.next_event += 1;
                self.events.insert(id, (ty, addr));
                w.u32(id);
                ok(w)
            }
            CommandCode::EventDestroy => match r.u32() {
                Ok(id) if self.events.remove(&id).is_some() => {
                    w.u32(id);
                    ok(w)
                }
                _ => fail,
            },
            _ => fail,
        }
    }

    /// Arcs as `(arc, begin, end)`.
    fn arc_triples(&self) -> Vec<(ScAddr, ScAddr, ScAddr)> {
        self.arcs()
            .into_iter()
            .map(|(a, e)| (a, e.begin, e.end))
            .collect()
    }

    fn matches(&self, pattern: &Pattern) -> Vec<Vec<ScAddr>> {
        let slots = pattern.slots();
        let fixed = |i: usize| match slots[i] {
            sctp_client::Slot::Fixed(a) => Some(a),
            sctp_client::Slot::Any => None,
        };
        let (source, target) = (fixed(0), fixed(2));
        let arcs = self.arc_triples();

        let mut out = Vec::new();
        for &(arc, begin, end) in &arcs {
            if source.is_some_and(|s| s != begin) || target.is_some_and(|t| t != end) {
                continue;
            }
            if slots.len() == 3 {
                out.push(vec![begin, arc, end]);
                continue;
            }
            let attr = fixed(4);
            for &(attr_arc, attr_begin, attr_end) in &arcs {
                if attr_end != arc || attr.is_some_and(|a| a != attr_begin) {
                    continue;
                }
                out.push(vec![begin, arc, end, attr_arc, attr_begin]);
            }
        }
        out
    }
}

impl Read for FakeStore {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut s = self.state();
        let limit = s.read_sizes[s.read_idx % s.read_sizes.len()];
        s.read_idx += 1;
        let n = buf.len().min(limit).min(s.outbox.len());
        for (slot, byte) in buf.iter_mut().zip(s.outbox.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for FakeStore {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut s = self.state();
        if s.closed {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        s.inbox.extend_from_slice(buf);
        s.process();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for FakeStore {
    fn close(&mut self) -> io::Result<()> {
        self.state().closed = true;
        Ok(())
    }
}

/// Raw response frame.
pub fn frame(command: CommandCode, result: ResultCode, payload: &[u8]) -> Vec<u8> {
    let mut bytes = ResponseHeader::new(command, result, payload.len() as u32)
        .to_bytes()
        .to_vec();
    bytes.extend_from_slice(payload);
    bytes
}
