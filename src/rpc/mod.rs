//! JSON-RPC transport and parallel request fan-out

mod outcome;
mod parallel;
mod transport;

pub use outcome::RequestOutcome;
pub use parallel::{parallel_call_method, run_parallel};
pub use transport::{HttpCaller, MethodCaller};
