//! HTTP API module for the payroll engine.
//!
//! This module exposes the payroll workflow, payslips, and salary structures
//! as REST endpoints under `/payroll`. The acting user is read from the
//! `x-actor-id` header set by the authenticating proxy.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ACTOR_HEADER, create_router};
pub use request::{
    ApproveRequest, AsOfQuery, CreatePayrollRequest, RejectRequest, SalaryStructureRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, EntryResponse, GenerationResponse, PayslipResponse,
    PeriodResponse, SkippedResponse, StructureResponse,
};
pub use state::AppState;
