use serde::Serialize;

use crate::answers::ResponseTable;
use crate::intents::IntentTable;
use crate::table::RecordTable;
use crate::transcript::{Entry, Speaker, Transcript};

pub const FALLBACK_ANSWER: &str = "Lo siento, no entendí tu consulta. Intenta con otra pregunta.";

/// Outcome of one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub input: String,
    /// Resolved intent key, `None` when no trigger phrase matched.
    pub intent: Option<String>,
    /// Key of the answer that was returned, `None` for the fallback.
    pub answer_key: Option<String>,
    pub answer: String,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.answer_key.is_none()
    }
}

/// Intent table + response table. Immutable once built.
#[derive(Debug, Clone)]
pub struct Responder {
    intents: IntentTable,
    responses: ResponseTable,
}

impl Responder {
    pub fn new(intents: IntentTable, responses: ResponseTable) -> Self {
        Self { intents, responses }
    }

    /// Stock phrase table with answers computed from `records`.
    pub fn from_records(records: &RecordTable) -> Self {
        Self::new(IntentTable::builtin(), ResponseTable::from_records(records))
    }

    pub fn intents(&self) -> &IntentTable {
        &self.intents
    }

    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }

    pub fn reply(&self, input: &str) -> Reply {
        let intent = self.intents.resolve(input);
        let answer = intent.and_then(|key| self.responses.dispatch(key));

        Reply {
            input: input.to_string(),
            intent: intent.map(str::to_string),
            answer_key: answer.map(|a| a.key.clone()),
            answer: answer
                .map(|a| a.text.clone())
                .unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
        }
    }

    /// Answer one turn and record it: user text first, then the reply.
    pub fn submit(&self, transcript: &mut Transcript, input: &str) -> Reply {
        let reply = self.reply(input);
        transcript.push(Speaker::User, input);
        transcript.push(Speaker::Bot, reply.answer.clone());
        reply
    }

    /// Intent keys for which no response key would match; these always fall back.
    pub fn unanswerable_intents(&self) -> Vec<&str> {
        self.intents
            .iter()
            .map(|i| i.key.as_str())
            .filter(|key| self.responses.dispatch(key).is_none())
            .collect()
    }
}

/// One chat session: a borrowed responder plus the session's own transcript.
/// Dropping the session discards its transcript.
pub struct ChatSession<'a> {
    responder: &'a Responder,
    transcript: Transcript,
}

impl<'a> ChatSession<'a> {
    pub fn new(responder: &'a Responder) -> Self {
        Self { responder, transcript: Transcript::new() }
    }

    pub fn submit(&mut self, input: &str) -> String {
        self.responder.submit(&mut self.transcript, input).answer
    }

    pub fn submit_reply(&mut self, input: &str) -> Reply {
        self.responder.submit(&mut self.transcript, input)
    }

    pub fn transcript(&self) -> &[Entry] {
        self.transcript.entries()
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }
}
