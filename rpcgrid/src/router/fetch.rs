use rpcgrid_core::{
    EndpointSpec, FailureKind, FetchResult, GridError, NOT_AUTHORIZED_LABEL, ParseOutcome,
    ParsedTable, RpcTransport, decode_response, parse_with, remap_rows,
};

use crate::RpcGrid;
use crate::router::util::{ERROR_LABEL, PARSE_ERROR_LABEL, settle};

/// A finished endpoint call: the caller-facing result plus the parsed table it
/// was remapped from, kept for identity resolution.
pub(crate) struct EndpointRun {
    pub(crate) result: FetchResult,
    pub(crate) table: Option<ParsedTable>,
}

impl EndpointRun {
    const fn done(result: FetchResult) -> Self {
        Self {
            result,
            table: None,
        }
    }
}

impl RpcGrid {
    /// Fetch one endpoint and normalize it into the endpoint's target schema.
    ///
    /// Behavior:
    /// - `account` equal to the profile's auth-failure marker skips the remote call
    ///   and yields an `Authentication Failed` placeholder.
    /// - Otherwise the call's payload is unwrapped, decoded and parsed; the four
    ///   parse outcomes map to: no rows without error, a `Not Authorized` placeholder,
    ///   a parse-error placeholder, or rows remapped by column name.
    /// - A transport error becomes a placeholder carrying the error text.
    ///
    /// Never fails: every branch yields a `FetchResult` whose `headers` equal the
    /// endpoint schema.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "rpcgrid::router::standard_fetch",
            skip(self, transport, endpoint),
            fields(section = %endpoint.section, method = %endpoint.method),
        )
    )]
    pub async fn standard_fetch(
        &self,
        transport: &dyn RpcTransport,
        endpoint: &EndpointSpec,
        account: Option<&str>,
    ) -> FetchResult {
        settle(endpoint, async {
            self.run_endpoint(transport, endpoint, account).await.result
        })
        .await
    }

    pub(crate) async fn run_endpoint(
        &self,
        transport: &dyn RpcTransport,
        endpoint: &EndpointSpec,
        account: Option<&str>,
    ) -> EndpointRun {
        let schema = endpoint.schema.clone();

        if account == Some(self.profile.auth_failed_marker.as_str()) {
            #[cfg(feature = "tracing")]
            tracing::debug!(section = %endpoint.section, "skipping call after failed identity resolution");
            return EndpointRun::done(FetchResult::auth_failed(schema));
        }

        let params = endpoint.call_params(account);
        let raw = match transport.call(&endpoint.method, params).await {
            Ok(raw) => raw,
            Err(e) => {
                return EndpointRun::done(call_failed(endpoint, FailureKind::Transport, &e));
            }
        };

        let text = match decode_response(raw, &endpoint.method).await {
            Ok(text) => text,
            Err(e) => return EndpointRun::done(call_failed(endpoint, FailureKind::Parse, &e)),
        };

        let columns = endpoint.source_columns.as_deref();
        match parse_with(endpoint.parser, text.as_deref(), columns) {
            ParseOutcome::Empty => EndpointRun::done(FetchResult::empty(schema)),
            ParseOutcome::AuthFailure => {
                #[cfg(feature = "tracing")]
                tracing::warn!(section = %endpoint.section, "payload carried the not-authorized sentinel");
                EndpointRun::done(FetchResult::failed(
                    schema,
                    FailureKind::Auth,
                    NOT_AUTHORIZED_LABEL,
                    NOT_AUTHORIZED_LABEL,
                ))
            }
            ParseOutcome::ParseError(f) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(section = %endpoint.section, details = %f.details, "unparseable payload");
                EndpointRun::done(FetchResult::failed(
                    schema,
                    FailureKind::Parse,
                    PARSE_ERROR_LABEL,
                    format!("Parse error: {}", f.details),
                ))
            }
            ParseOutcome::Rows(table) => {
                let data = remap_rows(&table.rows, &schema, &endpoint.aliases);
                EndpointRun {
                    result: FetchResult::ok(schema, data),
                    table: Some(table),
                }
            }
        }
    }
}

/// Placeholder for a call that failed before any rows could be parsed.
fn call_failed(endpoint: &EndpointSpec, kind: FailureKind, e: &GridError) -> FetchResult {
    #[cfg(feature = "tracing")]
    tracing::warn!(section = %endpoint.section, method = %endpoint.method, error = %e, "endpoint call failed");
    let label = match kind {
        FailureKind::Parse => PARSE_ERROR_LABEL,
        _ => ERROR_LABEL,
    };
    FetchResult::failed(
        endpoint.schema.clone(),
        kind,
        label,
        format!("Failed to fetch {}: {e}", endpoint.section),
    )
}
