//! Authentication: gateway token generation and the interactive login flow.
//!
//! - `GatewayTokenGenerator`: signed `X-api-key` token for the remote gateway
//! - `AuthenticationFlow`: turns an empty profile session into a populated one
//! - `CredentialReader`: how the flow obtains the CPF and password

pub mod flow;
pub mod gateway;

pub use flow::{AuthOutcome, AuthenticationFlow, CredentialReader};
pub use gateway::GatewayTokenGenerator;
