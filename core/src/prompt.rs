//! Safety-constrained prompt construction.
//!
//! The constraints below are instructions to the model, not local filters.
//! They are embedded verbatim in the system message of every request.

use crate::message::{ChatMessage, ChatTurn};
use crate::risk::RiskProfile;
use crate::session;

/// Fixed answer the model must give to any treatment-adjacent question.
pub const TREATMENT_REFUSAL: &str =
    "I cannot recommend treatments or medications. Please consult a dermatologist for a proper care plan.";

pub const SAFETY_CONSTRAINTS: &str = concat!(
    "You are a dermatology education assistant for the Melascope DX project. ",
    "You are NOT a doctor. You DO NOT diagnose, prescribe, or give medical instructions.\n",
    "SAFETY CONSTRAINTS (NEVER BREAK):\n",
    "1. NO DIAGNOSIS: Never say 'You have X'. Say 'The image shows signs consistent with X'.\n",
    "2. STRICTLY NO TREATMENTS OR MEDICATIONS: You must NOT mention any liquid, cream, pill, or procedure names, ",
    "NOT EVEN categories like 'corticosteroids' or 'antifungals'. If asked about treatment, you MUST say: ",
    "'I cannot recommend treatments or medications. Please consult a dermatologist for a proper care plan.'\n",
    "3. NO EMERGENCIES: Do not triage or rank urgency. Always say 'See a doctor'.\n",
    "4. UNCERTAINTY: Always imply uncertainty. Use phrases like 'typically', 'common presentation'.\n",
);

const ADVISORY_TASK: &str = concat!(
    "\nTASK: Provide structured advice for the predicted label.\n",
    "Output JSON with keys: title, summary, next_steps, prevention, disclaimer.",
);

const CHAT_TASK: &str = concat!(
    "\nTASK: Answer the user's follow-up question about the lesion.\n",
    "Keep answers concise (2-3 sentences max unless asked for detail).\n",
    "Maintain the safety tone established by the risk profile.",
);

/// Messages for the structured advisory request.
pub fn advisory_messages(label: &str, confidence: f64, profile: &RiskProfile) -> Vec<ChatMessage> {
    let system = format!("{SAFETY_CONSTRAINTS}{ADVISORY_TASK}");
    let user = format!(
        "Label: {label}\n\
         Confidence: {confidence:.2}\n\
         Risk Category: {tier}\n\
         Type: {category}\n\
         Context: {note}\n\n\
         Generate JSON.",
        tier = profile.tier,
        category = profile.category,
        note = profile.note,
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Messages for a chat continuation: instructions, risk context, then history.
pub fn chat_messages(label: &str, profile: &RiskProfile, history: &[ChatTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(format!("{SAFETY_CONSTRAINTS}{CHAT_TASK}")));
    messages.push(ChatMessage::system(format!(
        "Current Context - Condition: {label}, Risk: {tier}, Type: {category}.",
        tier = profile.tier,
        category = profile.category,
    )));
    messages.extend(session::adapt(history));
    messages
}
