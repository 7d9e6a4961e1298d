mod me;

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Result, Schema,
    SimpleObject,
};
use chrono::Utc;
use platform_api::{ApiError, internal_error};
use products_hr::{HrError, HrModule, RecordStore};
use serde::Serialize;
use tracing::instrument;

pub use me::MePayload;

use crate::{session::Identity, store::Store};

pub type SchemaType = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub struct GraphqlData {
    pub hr: HrModule<Store>,
}

pub fn build_schema(data: GraphqlData) -> SchemaType {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(data)
        .finish()
}

/// SDL snapshot; resolvers are not needed to print it.
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .finish()
        .sdl()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self, ctx: &Context<'_>) -> Result<HealthPayload> {
        let data = graphql_data(ctx)?;
        let store_ok = data.hr.store().ping().await.is_ok();
        Ok(HealthPayload {
            ok: store_ok,
            store: data.hr.store().kind().to_string(),
        })
    }

    #[instrument(name = "graphql.me", skip_all)]
    async fn me(&self, ctx: &Context<'_>) -> Result<MePayload> {
        let identity = ctx
            .data::<Identity>()
            .map_err(|_| ApiError::Unauthorized.extend())?;
        let data = graphql_data(ctx)?;
        let overview = data
            .hr
            .overview(
                identity.employee_number,
                identity.internal_id,
                Utc::now().date_naive(),
            )
            .await
            .map_err(|err| match err {
                HrError::NotFound => ApiError::NotFound("Employee not found".into()).extend(),
                other => ApiError::from(other).extend(),
            })?;
        Ok(MePayload::from_overview(identity, overview))
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> Result<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }
}

fn graphql_data<'a>(ctx: &Context<'a>) -> Result<&'a GraphqlData> {
    ctx.data::<GraphqlData>()
        .map_err(|err| internal_error(anyhow::anyhow!(err.message)))
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
    pub store: String,
}
