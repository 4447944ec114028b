use std::io;

use tracing::{debug, info, warn};

use crate::api::{LoginRequest, LoginTransport};
use crate::error::{Error, Result};
use crate::models::{Profile, Session};
use crate::store::ProfileStore;

use super::GatewayTokenGenerator;

/// Source of login credentials. The CLI prompts on the terminal; tests feed
/// fixed values.
pub trait CredentialReader {
    /// CPF, read as plain echoed input
    fn read_identifier(&mut self) -> io::Result<String>;

    /// Password, read without echo
    fn read_secret(&mut self) -> io::Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The stored session already had a token; nothing was prompted or sent
    AlreadyAuthenticated(Profile),
    /// A new session was obtained and saved
    Authenticated(Profile),
}

impl AuthOutcome {
    pub fn profile(&self) -> &Profile {
        match self {
            AuthOutcome::AlreadyAuthenticated(profile) | AuthOutcome::Authenticated(profile) => {
                profile
            }
        }
    }
}

pub struct AuthenticationFlow<'a, T, R> {
    store: &'a ProfileStore,
    transport: T,
    reader: R,
    gateway: GatewayTokenGenerator,
}

impl<'a, T, R> AuthenticationFlow<'a, T, R>
where
    T: LoginTransport,
    R: CredentialReader,
{
    pub fn new(store: &'a ProfileStore, transport: T, reader: R) -> Self {
        Self {
            store,
            transport,
            reader,
            gateway: GatewayTokenGenerator::new(),
        }
    }

    /// Authenticate `profile_name`, prompting for credentials only when the
    /// stored session is empty.
    ///
    /// On any error the stored profile is left exactly as it was.
    pub async fn authenticate(&mut self, profile_name: &str) -> Result<AuthOutcome> {
        let name = profile_name.trim();
        if name.is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        if !self.store.contains(name) {
            return Err(Error::NotFound(name.to_string()));
        }

        let mut profile = self.store.load(name)?;
        if profile.is_authenticated() {
            debug!(profile = name, "Session already present, skipping login");
            return Ok(AuthOutcome::AlreadyAuthenticated(profile));
        }

        let request = LoginRequest {
            cpf: self.reader.read_identifier().map_err(Error::Input)?,
            password: self.reader.read_secret().map_err(Error::Input)?,
        };

        let gateway_token = self.gateway.generate()?;
        let reply = self.transport.login(&request, &gateway_token).await?;

        if !reply.status.is_success() {
            warn!(profile = name, status = %reply.status, "Login rejected");
            return Err(Error::InvalidCredentials);
        }

        let session: Session = serde_json::from_str(&reply.body)
            .map_err(|e| Error::ProtocolError(format!("unparsable session: {}", e)))?;
        if !session.is_authenticated() {
            return Err(Error::ProtocolError("response carried no session token".to_string()));
        }

        profile.session = session;
        self.store.save(&profile)?;

        info!(profile = name, user = %profile.session.full_name(), "Profile authenticated");
        Ok(AuthOutcome::Authenticated(profile))
    }
}

// ============================================================================
// Tests
// ============================================================================
