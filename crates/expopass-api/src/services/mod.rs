// Service layer for business logic

mod attendee;
mod matchmaking;

pub use attendee::AttendeeService;
pub use matchmaking::MatchmakingService;
