//! # CLI Command Implementations
//!
//! One function per subcommand. Each runs a single store operation and
//! prints the result as text or, in JSON mode, as one JSON document.
//! Absent results print `not found` (text) or `null` (JSON).

use sctp_client::{
    ClientError, EventType, Initiation, PatternMatch, ScAddr, ScType, SctpClient, Slot,
    StatSample, Transport, initiate_question,
};

const NOT_FOUND: &str = "not found";

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn done(ok: bool) -> &'static str {
    if ok { "ok" } else { "rejected" }
}

// =============================================================================
// ELEMENT COMMANDS
// =============================================================================

/// Check whether an element exists.
pub fn cmd_check<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    addr: ScAddr,
) -> Result<(), ClientError> {
    let exists = client.element_exists(addr)?;

    if json_mode {
        print_json(&serde_json::json!({ "addr": addr, "exists": exists }));
        return Ok(());
    }
    println!("{}: {}", addr, if exists { "exists" } else { NOT_FOUND });
    Ok(())
}

/// Show the type mask of an element.
pub fn cmd_type<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    addr: ScAddr,
) -> Result<(), ClientError> {
    let ty = client.element_type(addr)?;

    if json_mode {
        print_json(&serde_json::json!({
            "addr": addr,
            "type": ty,
            "names": ty.map(|t| t.to_string()),
        }));
        return Ok(());
    }
    match ty {
        Some(ty) => println!("{}: {} ({:#06x})", addr, ty, ty.bits()),
        None => println!("{}: {}", addr, NOT_FOUND),
    }
    Ok(())
}

/// Erase an element.
pub fn cmd_erase<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    addr: ScAddr,
) -> Result<(), ClientError> {
    let erased = client.erase_element(addr)?;

    if json_mode {
        print_json(&serde_json::json!({ "addr": addr, "erased": erased }));
        return Ok(());
    }
    println!("erase {}: {}", addr, done(erased));
    Ok(())
}

/// Create a node of type `ty`.
pub fn cmd_create_node<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    ty: ScType,
) -> Result<(), ClientError> {
    let addr = client.create_node(ty)?;
    print_created(json_mode, "node", addr);
    Ok(())
}

/// Create a link, then set its content if any was given.
pub fn cmd_create_link<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    content: Option<&str>,
) -> Result<(), ClientError> {
    let addr = client.create_link()?;

    let content_set = match (addr, content) {
        (Some(link), Some(content)) => Some(client.set_link_content(link, content.as_bytes())?),
        _ => None,
    };
    if content_set == Some(false) {
        tracing::warn!("link created but the store rejected its content");
    }

    if json_mode {
        print_json(&serde_json::json!({ "link": addr, "content_set": content_set }));
        return Ok(());
    }
    print_created(false, "link", addr);
    Ok(())
}

/// Create an arc of type `ty` from `begin` to `end`.
pub fn cmd_create_arc<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    ty: ScType,
    begin: ScAddr,
    end: ScAddr,
) -> Result<(), ClientError> {
    let addr = client.create_arc(ty, begin, end)?;
    print_created(json_mode, "arc", addr);
    Ok(())
}

fn print_created(json_mode: bool, kind: &str, addr: Option<ScAddr>) {
    if json_mode {
        let mut object = serde_json::Map::new();
        object.insert(kind.to_string(), serde_json::json!(addr));
        print_json(&serde_json::Value::Object(object));
        return;
    }
    match addr {
        Some(addr) => println!("{} {}", kind, addr),
        None => println!("{}: {}", kind, done(false)),
    }
}

/// Show the endpoints of an arc.
pub fn cmd_arc<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    addr: ScAddr,
) -> Result<(), ClientError> {
    let endpoints = client.arc_endpoints(addr)?;

    if json_mode {
        let value = endpoints.map(|(begin, end)| serde_json::json!({ "begin": begin, "end": end }));
        print_json(&serde_json::json!({ "arc": addr, "endpoints": value }));
        return Ok(());
    }
    match endpoints {
        Some((begin, end)) => println!("{} -> {}", begin, end),
        None => println!("{}: {}", addr, NOT_FOUND),
    }
    Ok(())
}

// =============================================================================
// LINK COMMANDS
// =============================================================================

/// Print the content of a link. Non-UTF-8 bytes are shown lossily in text
/// mode and as a byte array in JSON mode.
pub fn cmd_content<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    addr: ScAddr,
) -> Result<(), ClientError> {
    let content = client.link_content(addr)?;

    if json_mode {
        let value = content.map(|bytes| match String::from_utf8(bytes) {
            Ok(text) => serde_json::Value::String(text),
            Err(e) => serde_json::json!(e.into_bytes()),
        });
        print_json(&serde_json::json!({ "link": addr, "content": value }));
        return Ok(());
    }
    match content {
        Some(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
        None => println!("{}: {}", addr, NOT_FOUND),
    }
    Ok(())
}

/// Replace the content of a link.
pub fn cmd_set_content<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    addr: ScAddr,
    content: &str,
) -> Result<(), ClientError> {
    let set = client.set_link_content(addr, content.as_bytes())?;

    if json_mode {
        print_json(&serde_json::json!({ "link": addr, "set": set }));
        return Ok(());
    }
    println!("set content of {}: {}", addr, done(set));
    Ok(())
}

/// List links whose content equals `content`.
pub fn cmd_find_links<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    content: &str,
) -> Result<(), ClientError> {
    let links = client.find_links_with_content(content.as_bytes())?;

    if json_mode {
        print_json(&serde_json::json!({ "content": content, "links": links }));
        return Ok(());
    }
    match links {
        Some(links) if links.is_empty() => println!("no links"),
        Some(links) => {
            for link in links {
                println!("{}", link);
            }
        }
        None => println!("{}", NOT_FOUND),
    }
    Ok(())
}

// =============================================================================
// ITERATION
// =============================================================================

/// Print every fragment matching the slot layout, one per line.
pub fn cmd_iterate<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    slots: &[Slot],
) -> Result<(), ClientError> {
    let matches = client.iterate_slots(slots)?;

    if json_mode {
        let pattern: Vec<String> = slots.iter().map(ToString::to_string).collect();
        print_json(&serde_json::json!({
            "pattern": pattern,
            "count": matches.len(),
            "matches": matches,
        }));
        return Ok(());
    }
    if matches.is_empty() {
        println!("no matches");
    }
    for m in &matches {
        println!("{}", format_match(m));
    }
    Ok(())
}

/// Space-separated addresses of one match.
pub fn format_match(m: &PatternMatch) -> String {
    m.as_slice()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// SYSTEM IDENTIFIERS
// =============================================================================

/// Find the element with a system identifier.
pub fn cmd_resolve<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    idtf: &str,
) -> Result<(), ClientError> {
    let addr = client.resolve_system_identifier(idtf)?;

    if json_mode {
        print_json(&serde_json::json!({ "idtf": idtf, "addr": addr }));
        return Ok(());
    }
    match addr {
        Some(addr) => println!("{}", addr),
        None => println!("{}: {}", idtf, NOT_FOUND),
    }
    Ok(())
}

/// Give an element a system identifier.
pub fn cmd_set_idtf<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    addr: ScAddr,
    idtf: &str,
) -> Result<(), ClientError> {
    let set = client.set_system_identifier(addr, idtf)?;

    if json_mode {
        print_json(&serde_json::json!({ "addr": addr, "idtf": idtf, "set": set }));
        return Ok(());
    }
    println!("set {} = {}: {}", idtf, addr, done(set));
    Ok(())
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Show statistics samples between `begin` and `end`.
pub fn cmd_stats<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    begin: u64,
    end: u64,
) -> Result<(), ClientError> {
    let samples = client.statistics(begin, end)?;

    if json_mode {
        print_json(&serde_json::json!({ "begin": begin, "end": end, "samples": samples }));
        return Ok(());
    }
    match samples {
        Some(samples) if samples.is_empty() => println!("no samples"),
        Some(samples) => {
            println!("SCTP Store Statistics");
            println!("=====================");
            for sample in &samples {
                println!();
                print_sample(sample);
            }
        }
        None => println!("statistics: {}", NOT_FOUND),
    }
    Ok(())
}

fn print_sample(s: &StatSample) {
    println!(
        "Time:        {}{}",
        s.time,
        if s.is_initial { " (initial)" } else { "" }
    );
    println!(
        "Nodes:       {} ({} live)",
        s.node_count, s.live_node_count
    );
    println!("Arcs:        {} ({} live)", s.arc_count, s.live_arc_count);
    println!(
        "Links:       {} ({} live)",
        s.link_count, s.live_link_count
    );
    println!("Empty:       {}", s.empty_count);
    println!("Connections: {}", s.connection_count);
    println!(
        "Commands:    {} ({} failed)",
        s.command_count, s.command_error_count
    );
}

// =============================================================================
// EVENTS AND AGENTS
// =============================================================================

/// Create a subscription. It is released when the client shuts down.
pub fn cmd_subscribe<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    event_type: EventType,
    addr: ScAddr,
) -> Result<(), ClientError> {
    let id = client.subscribe(event_type, addr)?;

    if json_mode {
        print_json(&serde_json::json!({
            "event_type": event_type,
            "addr": addr,
            "id": id,
        }));
        return Ok(());
    }
    match id {
        Some(id) => println!("subscription {} ({} on {})", id, event_type.as_str(), addr),
        None => println!("subscribe {}: {}", addr, done(false)),
    }
    Ok(())
}

/// Initiate a question for store-side agents.
pub fn cmd_initiate<T: Transport>(
    client: &mut SctpClient<T>,
    json_mode: bool,
    class: &str,
    question: &str,
) -> Result<(), ClientError> {
    let outcome = initiate_question(client, class, question)?;

    if json_mode {
        let value = match &outcome {
            Initiation::Initiated { question, arcs } => serde_json::json!({
                "initiated": true,
                "question": question,
                "arcs": arcs,
            }),
            Initiation::MissingKeynode(idtf) => serde_json::json!({
                "initiated": false,
                "missing": idtf,
            }),
            Initiation::ArcRejected { begin, end } => serde_json::json!({
                "initiated": false,
                "rejected_arc": { "begin": begin, "end": end },
            }),
        };
        print_json(&value);
        return Ok(());
    }
    match outcome {
        Initiation::Initiated { question, .. } => println!("question {} initiated", question),
        Initiation::MissingKeynode(idtf) => println!("{}: {}", idtf, NOT_FOUND),
        Initiation::ArcRejected { begin, end } => {
            println!("arc {} -> {}: {}", begin, end, done(false));
        }
    }
    Ok(())
}
