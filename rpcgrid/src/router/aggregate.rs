use rpcgrid_core::{
    AggregateResult, DataSource, EndpointSpec, FailureKind, FetchResult, GridError,
    RpcTransport, primary_account,
};

use crate::RpcGrid;
use crate::core::now_timestamp;
use crate::router::util::{ERROR_LABEL, aggregate_status, settle};

impl RpcGrid {
    /// Fetch every configured section for the primary account.
    ///
    /// Behavior:
    /// - Opens one transport session. If that fails every section gets a placeholder
    ///   and the data source is `error`.
    /// - Resolves the account through the identity endpoint first. If no account can
    ///   be extracted, every dependent section reports `Authentication Failed`
    ///   without a remote call and the data source is `error_auth`.
    /// - Otherwise runs all dependent endpoints concurrently. A failing or panicking
    ///   call only marks its own section; the rest still complete.
    ///
    /// Sections appear in profile order, identity first. Never fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "rpcgrid::router::get_all_account_details",
            skip(self),
            fields(dependents = self.profile.dependents.len()),
        )
    )]
    pub async fn get_all_account_details(&self) -> AggregateResult {
        let transport = match self.session.connect().await {
            Ok(t) => t,
            Err(e) => return self.session_failed(&e),
        };

        let (identity, account) = self.resolve_identity(transport.as_ref()).await;
        let identity_resolved = account.is_some();
        let account = account.unwrap_or_else(|| self.profile.auth_failed_marker.clone());

        let tasks = self.profile.dependents.iter().map(|endpoint| {
            let transport = transport.as_ref();
            let account = account.as_str();
            async move {
                self.standard_fetch(transport, endpoint, Some(account))
                    .await
            }
        });
        let dependents = futures::future::join_all(tasks).await;

        let data_source = aggregate_status(identity_resolved, &dependents);
        #[cfg(feature = "tracing")]
        tracing::debug!(data_source = %data_source, "aggregate complete");

        let mut sections = Vec::with_capacity(dependents.len() + 1);
        sections.push((self.profile.identity.section.clone(), identity));
        sections.extend(
            self.profile
                .dependents
                .iter()
                .map(|e| e.section.clone())
                .zip(dependents),
        );

        AggregateResult {
            sections,
            timestamp: now_timestamp(),
            data_source,
        }
    }

    /// Run the identity endpoint and pick the primary account from its rows.
    ///
    /// Returns the identity section as the caller will see it plus the account, if
    /// one was found. A clean identity call without a usable account column is
    /// reported as an auth failure on the identity section.
    pub async fn resolve_identity(
        &self,
        transport: &dyn RpcTransport,
    ) -> (FetchResult, Option<String>) {
        let endpoint = &self.profile.identity;
        let mut table = None;
        let result = settle(endpoint, async {
            let run = self.run_endpoint(transport, endpoint, None).await;
            table = run.table;
            run.result
        })
        .await;

        if !result.is_ok() {
            return (result, None);
        }

        let account = table
            .as_ref()
            .and_then(|t| primary_account(&t.rows, &self.profile.account_key));
        match account {
            Some(account) => (result, Some(account)),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    section = %endpoint.section,
                    key = %self.profile.account_key,
                    "identity response carried no account"
                );
                let failed = FetchResult::failed(
                    endpoint.schema.clone(),
                    FailureKind::Auth,
                    ERROR_LABEL,
                    format!(
                        "No account found under {} in {}",
                        self.profile.account_key, endpoint.section
                    ),
                );
                (failed, None)
            }
        }
    }

    /// Fetch a single section by name with its own session.
    ///
    /// `account` is passed through as-is; the profile's auth-failure marker skips
    /// the call exactly as in the aggregate path.
    ///
    /// # Errors
    /// Returns `NotFound` when the profile has no section named `name`. Session and
    /// call failures are reported inside the returned `FetchResult`.
    pub async fn fetch_section(
        &self,
        name: &str,
        account: Option<&str>,
    ) -> Result<FetchResult, GridError> {
        let endpoint = self
            .profile
            .endpoint(name)
            .ok_or_else(|| GridError::not_found(format!("section {name}")))?;
        match self.session.connect().await {
            Ok(transport) => Ok(self
                .standard_fetch(transport.as_ref(), endpoint, account)
                .await),
            Err(e) => Ok(session_placeholder(endpoint, &e)),
        }
    }

    fn session_failed(&self, e: &GridError) -> AggregateResult {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %e, "could not open transport session");
        AggregateResult {
            sections: self
                .profile
                .endpoints()
                .map(|endpoint| (endpoint.section.clone(), session_placeholder(endpoint, e)))
                .collect(),
            timestamp: now_timestamp(),
            data_source: DataSource::Error,
        }
    }
}

fn session_placeholder(endpoint: &EndpointSpec, e: &GridError) -> FetchResult {
    FetchResult::failed(
        endpoint.schema.clone(),
        FailureKind::Session,
        ERROR_LABEL,
        format!("Failed to fetch {}: {e}", endpoint.section),
    )
}
