//! MongoDB Atlas adapter.

use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use infrapulse_core::{Config, Credentials, ProviderKind};
use infrapulse_fetch::{optional, AuthStrategy, FetchContext, FetchError, PendingRequest};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::api::{
    RawAlert, RawCluster, RawDatabase, RawDatabaseUser, RawDisk, RawFlexCluster, RawGroup,
    RawMeasurements, RawPage, RawProcess, ATLAS_ACCEPT, ATLAS_API_BASE, ATLAS_FLEX_ACCEPT,
    GRANULARITY, ITEMS_PER_PAGE, PERIOD,
};
use super::models::{
    alert_record, cluster_record, disk_usage, flex_cluster_record, metrics_eligible,
    project_report, select_process, summarize, user_record, AtlasSummary, ClusterMetrics,
    ClusterRecord, DatabaseSize, DiskUsage, ProjectReport,
};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// MongoDB Atlas projects, clusters and process metrics.
///
/// Every request goes through the Digest handshake.
#[derive(Debug, Clone)]
pub struct AtlasAdapter {
    auth: AuthStrategy,
    api_base: String,
    database_cap: usize,
}

impl AtlasAdapter {
    /// Creates an adapter for a programmatic API key.
    pub fn new(public_key: &str, private_key: &str) -> Self {
        Self {
            auth: AuthStrategy::digest(public_key, private_key),
            api_base: ATLAS_API_BASE.to_string(),
            database_cap: 10,
        }
    }

    /// Builds the adapter if both keys are configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        match config.resolution(ProviderKind::Atlas).primary()? {
            Credentials::KeyPair {
                public_key,
                private_key,
            } => Some(Self::new(public_key, private_key).with_database_cap(config.caps.atlas_databases)),
            _ => None,
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Overrides how many databases are measured per cluster.
    #[must_use]
    pub fn with_database_cap(mut self, cap: usize) -> Self {
        self.database_cap = cap;
        self
    }

    /// Lists projects, then loads every project concurrently.
    #[instrument(skip(self, ctx))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<AtlasSummary, ProviderError> {
        let started = Instant::now();
        let groups = self.list_groups(ctx).await?;
        debug!(projects = groups.len(), "Listed Atlas projects");

        let projects = join_all(groups.into_iter().map(|group| self.load_project(ctx, group))).await;
        let summary = summarize(projects);

        info!(
            projects = summary.summary.projects,
            clusters = summary.summary.clusters,
            elapsed = ?started.elapsed(),
            "Fetched MongoDB Atlas data"
        );
        Ok(summary)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        ctx: &FetchContext,
        path: &str,
        accept: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.api_base.trim_end_matches('/'), path);
        let mut request = PendingRequest::get(&url)?.header(ACCEPT, accept);
        for (key, value) in query {
            request = request.query(key, value);
        }
        ctx.http.fetch_json(&self.auth, request).await
    }

    async fn list_groups(&self, ctx: &FetchContext) -> Result<Vec<RawGroup>, ProviderError> {
        let mut groups = Vec::new();
        let mut page = 1u32;
        let per_page = ITEMS_PER_PAGE.to_string();

        loop {
            let authenticated = page > 1;
            let page_num = page.to_string();
            let batch: RawPage<RawGroup> = self
                .get(
                    ctx,
                    "/groups",
                    ATLAS_ACCEPT,
                    &[("pageNum", &page_num), ("itemsPerPage", &per_page)],
                )
                .await
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?;

            let empty = batch.results.is_empty();
            groups.extend(batch.results);
            if empty || groups.len() as u64 >= batch.total_count {
                break;
            }
            page += 1;
        }

        Ok(groups)
    }

    async fn load_project(&self, ctx: &FetchContext, group: RawGroup) -> ProjectReport {
        let id = group.id.clone();
        let clusters_path = format!("/groups/{id}/clusters");
        let flex_path = format!("/groups/{id}/flexClusters");
        let users_path = format!("/groups/{id}/databaseUsers");
        let alerts_path = format!("/groups/{id}/alerts");
        let (clusters, flex, users, alerts) = tokio::join!(
            optional("atlas.clusters", self.list::<RawCluster>(ctx, &clusters_path, ATLAS_ACCEPT, &[])),
            optional("atlas.flex", self.list::<RawFlexCluster>(ctx, &flex_path, ATLAS_FLEX_ACCEPT, &[])),
            optional("atlas.users", self.list::<RawDatabaseUser>(ctx, &users_path, ATLAS_ACCEPT, &[])),
            optional("atlas.alerts", self.list::<RawAlert>(ctx, &alerts_path, ATLAS_ACCEPT, &[("status", "OPEN")])),
        );

        let clusters = match (clusters, flex) {
            (None, None) => None,
            (clusters, flex) => {
                let mut records: Vec<ClusterRecord> = clusters
                    .unwrap_or_default()
                    .into_iter()
                    .map(cluster_record)
                    .collect();
                records.extend(flex.unwrap_or_default().into_iter().map(flex_cluster_record));
                Some(self.measure_clusters(ctx, &id, records).await)
            }
        };

        let mut report = project_report(group);
        report.clusters = clusters;
        report.database_users = users.map(|users| users.into_iter().map(user_record).collect());
        report.open_alerts = alerts.map(|alerts| alerts.into_iter().map(alert_record).collect());
        report
    }

    async fn list<T: DeserializeOwned>(
        &self,
        ctx: &FetchContext,
        path: &str,
        accept: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, FetchError> {
        let page: RawPage<T> = self.get(ctx, path, accept, query).await?;
        Ok(page.results)
    }

    async fn measure_clusters(
        &self,
        ctx: &FetchContext,
        group_id: &str,
        mut clusters: Vec<ClusterRecord>,
    ) -> Vec<ClusterRecord> {
        if !clusters.iter().any(metrics_eligible) {
            return clusters;
        }
        let Some(processes) = optional(
            "atlas.processes",
            self.list::<RawProcess>(ctx, &format!("/groups/{group_id}/processes"), ATLAS_ACCEPT, &[]),
        )
        .await
        else {
            return clusters;
        };

        let metrics = join_all(clusters.iter().map(|cluster| {
            let process = metrics_eligible(cluster)
                .then(|| select_process(&processes, &cluster.name))
                .flatten();
            async move {
                match process {
                    Some(process) => Some(self.cluster_metrics(ctx, group_id, process).await),
                    None => None,
                }
            }
        }))
        .await;

        for (cluster, metrics) in clusters.iter_mut().zip(metrics) {
            cluster.metrics = metrics;
        }
        clusters
    }

    async fn cluster_metrics(
        &self,
        ctx: &FetchContext,
        group_id: &str,
        process: &RawProcess,
    ) -> ClusterMetrics {
        let base = format!("/groups/{group_id}/processes/{}", process.id);
        let (connections, disk, databases) = tokio::join!(
            optional("atlas.connections", self.connections(ctx, &base)),
            optional("atlas.disk", self.disk(ctx, &base)),
            optional("atlas.databases", self.databases(ctx, &base)),
        );
        ClusterMetrics {
            process: process.id.clone(),
            connections,
            disk,
            databases,
        }
    }

    async fn measurements(
        &self,
        ctx: &FetchContext,
        path: &str,
        metrics: &[&str],
    ) -> Result<RawMeasurements, FetchError> {
        let mut query = vec![("granularity", GRANULARITY), ("period", PERIOD)];
        query.extend(metrics.iter().map(|m| ("m", *m)));
        self.get(ctx, &format!("{path}/measurements"), ATLAS_ACCEPT, &query)
            .await
    }

    async fn connections(&self, ctx: &FetchContext, base: &str) -> Result<u64, FetchError> {
        let measurements = self.measurements(ctx, base, &["CONNECTIONS"]).await?;
        measurements
            .latest("CONNECTIONS")
            .map(as_count)
            .ok_or_else(|| FetchError::InvalidResponse("no CONNECTIONS data points".to_string()))
    }

    async fn disk(&self, ctx: &FetchContext, base: &str) -> Result<DiskUsage, FetchError> {
        let disks = self
            .list::<RawDisk>(ctx, &format!("{base}/disks"), ATLAS_ACCEPT, &[])
            .await?;
        let partition = disks
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::InvalidResponse("process has no disks".to_string()))?
            .partition_name;

        let measurements = self
            .measurements(
                ctx,
                &format!("{base}/disks/{partition}"),
                &["DISK_PARTITION_SPACE_USED", "DISK_PARTITION_SPACE_FREE"],
            )
            .await?;
        let used = measurements.latest("DISK_PARTITION_SPACE_USED").map_or(0, as_count);
        let free = measurements.latest("DISK_PARTITION_SPACE_FREE").map_or(0, as_count);
        Ok(disk_usage(partition, used, free))
    }

    async fn databases(&self, ctx: &FetchContext, base: &str) -> Result<Vec<DatabaseSize>, FetchError> {
        let mut databases = self
            .list::<RawDatabase>(ctx, &format!("{base}/databases"), ATLAS_ACCEPT, &[])
            .await?;
        databases.truncate(self.database_cap);

        let sizes = join_all(databases.into_iter().map(|db| async move {
            let path = format!("{base}/databases/{}", db.database_name);
            let size = optional("atlas.database_size", self.measurements(ctx, &path, &["DATABASE_DATA_SIZE"]))
                .await
                .and_then(|m| m.latest("DATABASE_DATA_SIZE"))?;
            Some(DatabaseSize {
                name: db.database_name,
                data_size_bytes: as_count(size),
            })
        }))
        .await;

        let mut sizes: Vec<DatabaseSize> = sizes.into_iter().flatten().collect();
        sizes.sort_by(|a, b| b.data_size_bytes.cmp(&a.data_size_bytes).then_with(|| a.name.cmp(&b.name)));
        Ok(sizes)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

#[async_trait]
impl ProviderAdapter for AtlasAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Atlas
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderSummary, ProviderError> {
        self.fetch_summary(ctx).await.map(Into::into)
    }
}
