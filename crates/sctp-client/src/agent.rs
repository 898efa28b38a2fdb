//! # Agent Initiation
//!
//! Starts a store-side agent the way the knowledge base expects: a question
//! node is added to the `question` set, to its question class, and finally to
//! `question_initiated`, which is the set agents watch.
//!
//! Only the wire commands are issued here. The agents themselves run inside
//! the store.

use crate::client::SctpClient;
use crate::transport::Transport;
use crate::types::{Result, ScAddr, ScType};
use tracing::{debug, info};

/// System identifier of the set holding every question.
pub const QUESTION_IDTF: &str = "question";

/// System identifier of the set agents react to.
pub const QUESTION_INITIATED_IDTF: &str = "question_initiated";

/// Outcome of an initiation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initiation {
    /// All three membership arcs were created, in order.
    Initiated { question: ScAddr, arcs: [ScAddr; 3] },
    /// A system identifier didn't resolve.
    MissingKeynode(String),
    /// The store refused to create an arc. Arcs created before it remain.
    ArcRejected { begin: ScAddr, end: ScAddr },
}

/// Resolved keynodes for initiating questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionInitiator {
    question: ScAddr,
    question_initiated: ScAddr,
}

impl QuestionInitiator {
    /// Resolve the `question` and `question_initiated` keynodes.
    ///
    /// `Ok(Err(idtf))` names the first identifier the store doesn't know.
    pub fn resolve<T: Transport>(
        client: &mut SctpClient<T>,
    ) -> Result<std::result::Result<Self, String>> {
        let Some(question) = client.resolve_system_identifier(QUESTION_IDTF)? else {
            return Ok(Err(QUESTION_IDTF.to_string()));
        };
        let Some(question_initiated) = client.resolve_system_identifier(QUESTION_INITIATED_IDTF)?
        else {
            return Ok(Err(QUESTION_INITIATED_IDTF.to_string()));
        };
        debug!(%question, %question_initiated, "keynodes resolved");
        Ok(Ok(Self {
            question,
            question_initiated,
        }))
    }

    /// Initiate the question node named `question_node_idtf` as an instance
    /// of the question class named `question_class_idtf`.
    pub fn initiate<T: Transport>(
        &self,
        client: &mut SctpClient<T>,
        question_class_idtf: &str,
        question_node_idtf: &str,
    ) -> Result<Initiation> {
        let Some(class) = client.resolve_system_identifier(question_class_idtf)? else {
            return Ok(Initiation::MissingKeynode(question_class_idtf.to_string()));
        };
        let Some(node) = client.resolve_system_identifier(question_node_idtf)? else {
            return Ok(Initiation::MissingKeynode(question_node_idtf.to_string()));
        };

        // question_initiated goes last: agents fire on that arc.
        let mut arcs = [ScAddr::EMPTY; 3];
        for (slot, begin) in [self.question, class, self.question_initiated]
            .into_iter()
            .enumerate()
        {
            match client.create_arc(ScType::ARC_POS_CONST_PERM, begin, node)? {
                Some(arc) => arcs[slot] = arc,
                None => return Ok(Initiation::ArcRejected { begin, end: node }),
            }
        }

        info!(question = %node, class = question_class_idtf, "question initiated");
        Ok(Initiation::Initiated {
            question: node,
            arcs,
        })
    }
}

/// Resolve keynodes and initiate in one step.
pub fn initiate_question<T: Transport>(
    client: &mut SctpClient<T>,
    question_class_idtf: &str,
    question_node_idtf: &str,
) -> Result<Initiation> {
    match QuestionInitiator::resolve(client)? {
        Ok(initiator) => initiator.initiate(client, question_class_idtf, question_node_idtf),
        Err(missing) => Ok(Initiation::MissingKeynode(missing)),
    }
}
