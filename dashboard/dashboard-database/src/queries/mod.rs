pub mod activity_event_queries;
pub mod group_message_queries;
pub mod group_queries;
pub mod problem_queries;
pub mod report_queries;
