//! Operators that need their own termination logic, built on
//! [`Sink`](crate::sink::Sink).

pub mod max_by;
