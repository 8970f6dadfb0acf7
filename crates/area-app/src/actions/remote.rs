//! REST calls: bootstrap, queries, mutations and sign in

use area_api::{fetch_about_with_retry, AreaApi, Credentials};
use area_core::{ApiFailure, AuthMode, Error};
use tracing::{debug, info};

use crate::handler::{Mutation, QueryKey};
use crate::message::{Message, QueryData};
use crate::query::Ticket;

use super::{failure_of, ActionContext};

pub(super) fn spawn_bootstrap<A>(ctx: &ActionContext<A>)
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let api = ctx.api.clone();
    let policy = ctx.retry_policy;
    let cancel = ctx.shutdown_rx.clone();
    let tx = ctx.msg_tx.clone();

    tokio::spawn(async move {
        let message = match fetch_about_with_retry(&api, policy, cancel).await {
            Ok(about) => Message::CatalogLoaded(about),
            Err(Error::BootstrapCancelled) => {
                debug!("Bootstrap cancelled");
                return;
            }
            Err(e) => Message::BootstrapFailed(e.to_string()),
        };
        let _ = tx.send(message).await;
    });
}

/// Run one query against the API.
pub(super) async fn run_query<A: AreaApi>(api: &A, key: &QueryKey) -> Result<QueryData, ApiFailure> {
    let result = match key {
        QueryKey::ServiceAuthorizations => api
            .service_authorizations()
            .await
            .map(QueryData::ServiceAuthorizations),
        QueryKey::Authorizations => api.authorizations().await.map(QueryData::Authorizations),
        QueryKey::Applets => api.applets().await.map(QueryData::Applets),
        QueryKey::Store => api.store().await.map(QueryData::Store),
        QueryKey::Draft(field) => api.draft(*field).await.map(QueryData::Draft),
        QueryKey::Profile => api.profile().await.map(QueryData::Profile),
        QueryKey::Avatar => api.avatar().await.map(QueryData::Avatar),
        QueryKey::Applet { id } => api.applet(id).await.map(QueryData::Applet),
        QueryKey::AppletReactions { id } | QueryKey::UsageReactions { id } => {
            api.applet_reactions(id).await.map(QueryData::AppletReactions)
        }
    };
    result.map_err(failure_of)
}

/// Run one mutation; the success value is the server message.
pub(super) async fn run_mutation<A: AreaApi>(
    api: &A,
    mutation: &Mutation,
) -> Result<String, ApiFailure> {
    let result = match mutation {
        Mutation::AddDraftArea(request) => api.add_draft_area(request.clone()).await,
        Mutation::RemoveDraftArea(removal) => api.remove_draft_area(*removal).await,
        Mutation::SubmitDraft(request) => api.submit_draft(request.clone()).await,
        Mutation::SetAppletActivity { id, active } => api.set_applet_activity(id, *active).await,
        Mutation::StartApplet { id } => api.start_applet(id).await,
        Mutation::StopApplet { id } => api.stop_applet(id).await,
        Mutation::DeleteApplet { id } => api.delete_applet(id).await,
        Mutation::CreateAuthorization(exchange) => {
            api.create_authorization(exchange.clone()).await
        }
        Mutation::DeleteAuthorization { name } => api.delete_authorization(name).await,
        Mutation::UpdateProfile { username } => api.update_profile(username).await,
        Mutation::UpdateAvatar { path } => api.update_avatar(path.clone()).await,
        Mutation::DeleteProfile => api.delete_profile().await,
        Mutation::Logout => api.logout().await,
        Mutation::TriggerWebhook { applet, message } => api.trigger_webhook(applet, message).await,
    };
    result.map_err(failure_of)
}

pub(super) fn spawn_query<A>(ctx: &ActionContext<A>, key: QueryKey, ticket: Ticket)
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let api = ctx.api.clone();
    let tx = ctx.msg_tx.clone();
    tokio::spawn(async move {
        let result = run_query(&api, &key).await;
        let _ = tx.send(Message::QueryLoaded { key, ticket, result }).await;
    });
}

pub(super) fn spawn_mutation<A>(ctx: &ActionContext<A>, mutation: Mutation)
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let api = ctx.api.clone();
    let tx = ctx.msg_tx.clone();
    tokio::spawn(async move {
        let result = run_mutation(&api, &mutation).await;
        let _ = tx.send(Message::MutationDone { mutation, result }).await;
    });
}

pub(super) fn spawn_options<A>(
    ctx: &ActionContext<A>,
    service: String,
    field: String,
    endpoint: String,
    ticket: Ticket,
) where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let api = ctx.api.clone();
    let tx = ctx.msg_tx.clone();
    tokio::spawn(async move {
        let result = api
            .service_options(&service, &endpoint)
            .await
            .map_err(failure_of);
        let _ = tx
            .send(Message::FieldOptionsLoaded {
                service,
                field,
                endpoint,
                ticket,
                result,
            })
            .await;
    });
}

/// Exchange credentials for a token and keep it in the session.
pub(super) fn spawn_authenticate<A>(ctx: &ActionContext<A>, mode: AuthMode, credentials: Credentials)
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let api = ctx.api.clone();
    let session = ctx.session.clone();
    let tx = ctx.msg_tx.clone();
    tokio::spawn(async move {
        let message = match api.authenticate(mode, credentials).await {
            Ok(token) => match session.set_token(token) {
                Ok(()) => {
                    info!("Signed in ({})", mode.as_path());
                    Message::SignedIn
                }
                Err(e) => Message::SignInFailed(ApiFailure::Transport(format!(
                    "cannot store the session: {e}"
                ))),
            },
            Err(e) => Message::SignInFailed(failure_of(e)),
        };
        let _ = tx.send(message).await;
    });
}
