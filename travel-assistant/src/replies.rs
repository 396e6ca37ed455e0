//! Canned user-facing replies. The exact wording is part of the contract
//! with the frontend, so change these strings deliberately.

/// Returned when the incoming message is empty or whitespace.
pub const EMPTY_MESSAGE_REPLY: &str = "Please ask me something about travel!";

/// Returned when an input guardrail blocks the message.
pub const GUARDRAIL_REPLY: &str =
    "Sorry, I can't answer that type of question. Please ask me about travel-related topics.";

/// Returned on any failure other than a guardrail trip.
pub const FAILURE_REPLY: &str = "I apologize, but I'm having trouble processing your request \
     right now. Please try asking about travel destinations, weather, or restaurants.";

/// Returned when the model's answer folds down to an empty string.
pub const NO_RESPONSE_REPLY: &str = "I'm here to help you with travel planning! Ask me about \
     weather, restaurants, or itineraries for any destination.";
