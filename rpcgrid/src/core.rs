use std::sync::Arc;

use rpcgrid_core::{
    BrokerProfile, GridError, RpcTransport, SessionFactory, StaticSession,
};

/// Orchestrator that turns a broker profile into fixed-shape account reports.
pub struct RpcGrid {
    pub(crate) session: Arc<dyn SessionFactory>,
    pub(crate) profile: BrokerProfile,
}

/// Builder for constructing an `RpcGrid` orchestrator.
#[derive(Default)]
pub struct RpcGridBuilder {
    session: Option<Arc<dyn SessionFactory>>,
    profile: Option<BrokerProfile>,
}

impl RpcGridBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session per aggregate request through `factory`.
    ///
    /// A factory failure is the only path to the `error` data source, so put
    /// login/handshake logic here rather than inside the transport's `call`.
    #[must_use]
    pub fn session_factory(mut self, factory: Arc<dyn SessionFactory>) -> Self {
        self.session = Some(factory);
        self
    }

    /// Reuse one already-connected transport for every request.
    #[must_use]
    pub fn transport(self, transport: Arc<dyn RpcTransport>) -> Self {
        self.session_factory(Arc::new(StaticSession::new(transport)))
    }

    /// Set the broker profile (endpoints, schemas and sentinel conventions).
    #[must_use]
    pub fn profile(mut self, profile: BrokerProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Build the `RpcGrid` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no session factory or profile was supplied, or the
    /// profile fails validation.
    pub fn build(self) -> Result<RpcGrid, GridError> {
        let session = self.session.ok_or_else(|| {
            GridError::InvalidArg(
                "no session factory registered; add one via session_factory(...) or transport(...)"
                    .to_string(),
            )
        })?;
        let profile = self.profile.ok_or_else(|| {
            GridError::InvalidArg("no broker profile set; add one via profile(...)".to_string())
        })?;
        profile.validate()?;
        Ok(RpcGrid { session, profile })
    }
}

impl RpcGrid {
    /// Start building a new `RpcGrid` instance.
    ///
    /// ```rust,ignore
    /// let grid = rpcgrid::RpcGrid::builder()
    ///     .transport(transport)
    ///     .profile(BrokerProfile::from_json_str(PROFILE_JSON)?)
    ///     .build()?;
    /// let report = grid.get_all_account_details().await;
    /// ```
    #[must_use]
    pub fn builder() -> RpcGridBuilder {
        RpcGridBuilder::new()
    }

    /// The profile this orchestrator was built with.
    #[must_use]
    pub const fn profile(&self) -> &BrokerProfile {
        &self.profile
    }
}

/// RFC 3339 UTC timestamp with millisecond precision.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
