//! Export orchestration.
//!
//! Every export shape reduces to a list of `(context, parameter)` pairs plus
//! the notes produced while building it. Pairs are processed by a bounded
//! worker pool and written back into their enumeration slot, so the output
//! order never depends on completion order.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use pheno_config::ExportConfig;
use pheno_core::entities::MeasurementContext;
use pheno_core::ids::is_valid_key;
use pheno_core::responses::PairResult;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::EngineError;
use crate::retrieve::locate_and_fetch;
use crate::significance::{by_context, by_parameter, distinct};
use crate::store::MeasurementStore;

/// One unit of export work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPair {
    pub context: MeasurementContext,
    pub parameter_key: String,
}

impl ExportPair {
    fn new(context: &MeasurementContext, parameter_key: &str) -> Self {
        Self {
            context: context.clone(),
            parameter_key: parameter_key.to_string(),
        }
    }
}

/// Pairs to process and the notes collected while enumerating them.
#[derive(Debug, Default)]
pub struct ExportPlan {
    pub pairs: Vec<ExportPair>,
    pub notes: Vec<String>,
}

/// The two axes an export is capped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Genes,
    Parameters,
}

impl Axis {
    const fn label(self) -> &'static str {
        match self {
            Self::Genes => "genes",
            Self::Parameters => "parameters",
        }
    }
}

fn truncation_note(axis: Axis, max: usize, distinct_count: usize) -> String {
    format!(
        "Data for only {max} {} can be processed at a time; using the first {max} of {distinct_count}.",
        axis.label()
    )
}

/// Deduplicate an axis in first-occurrence order and keep the first `max`.
///
/// Blank identifiers are dropped. Returns the kept items and the distinct
/// count before truncation.
#[must_use]
pub fn cap_axis(items: &[String], max: usize) -> (Vec<String>, usize) {
    let mut kept = distinct(
        items
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| is_valid_key(s))
            .collect(),
    );
    let distinct_count = kept.len();
    kept.truncate(max);
    (kept, distinct_count)
}

/// An axis discovered across several lookups in one export.
///
/// Items are admitted in first-occurrence order across every lookup until the
/// cap is full; later newcomers are dropped. The union of admitted items never
/// exceeds the cap, and at most one note is emitted, citing the distinct count
/// of everything discovered.
#[derive(Debug)]
struct DiscoveredAxis<T> {
    axis: Axis,
    max: usize,
    admitted: HashSet<T>,
    seen: HashSet<T>,
}

impl<T: Clone + Eq + Hash> DiscoveredAxis<T> {
    fn new(axis: Axis, max: usize) -> Self {
        Self {
            axis,
            max,
            admitted: HashSet::new(),
            seen: HashSet::new(),
        }
    }

    /// Keep the items of one lookup that fit within the shared cap.
    fn admit(&mut self, items: Vec<T>) -> Vec<T> {
        let mut kept = Vec::new();
        for item in distinct(items) {
            self.seen.insert(item.clone());
            if self.admitted.contains(&item) {
                kept.push(item);
            } else if self.admitted.len() < self.max {
                self.admitted.insert(item.clone());
                kept.push(item);
            }
        }
        kept
    }

    fn note(&self) -> Option<String> {
        (self.seen.len() > self.max).then(|| truncation_note(self.axis, self.max, self.seen.len()))
    }
}

fn contexts_by_gene(contexts: Vec<MeasurementContext>) -> HashMap<String, Vec<MeasurementContext>> {
    let mut by_gene: HashMap<String, Vec<MeasurementContext>> = HashMap::new();
    for ctx in contexts {
        by_gene.entry(ctx.gene_id.clone()).or_default().push(ctx);
    }
    by_gene
}

/// Explicit gene list × explicit parameter list.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if context resolution fails.
pub async fn plan_bulk<S: MeasurementStore>(
    store: &S,
    gene_ids: &[String],
    parameter_keys: &[String],
    config: &ExportConfig,
) -> Result<ExportPlan, EngineError> {
    let (genes, gene_count) = cap_axis(gene_ids, config.max_genes);
    let (parameters, parameter_count) = cap_axis(parameter_keys, config.max_parameters);
    if genes.is_empty() || parameters.is_empty() {
        return Ok(ExportPlan::default());
    }

    let mut plan = ExportPlan::default();
    if gene_count > config.max_genes {
        plan.notes
            .push(truncation_note(Axis::Genes, config.max_genes, gene_count));
    }
    if parameter_count > config.max_parameters {
        plan.notes.push(truncation_note(
            Axis::Parameters,
            config.max_parameters,
            parameter_count,
        ));
    }

    let by_gene = contexts_by_gene(store.contexts_for_genes(&genes).await?);
    for gene in &genes {
        for ctx in by_gene.get(gene).into_iter().flatten() {
            for key in &parameters {
                plan.pairs.push(ExportPair::new(ctx, key));
            }
        }
    }
    Ok(plan)
}

/// Fixed parameter list; the gene axis is discovered per parameter from the
/// contexts with a significant annotation.
///
/// Pairs are enumerated parameter by parameter in discovery order.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if a significance lookup fails.
pub async fn plan_significant_genes<S: MeasurementStore>(
    store: &S,
    parameter_keys: &[String],
    threshold: f64,
    config: &ExportConfig,
) -> Result<ExportPlan, EngineError> {
    let (parameters, parameter_count) = cap_axis(parameter_keys, config.max_parameters);
    let mut plan = ExportPlan::default();
    if parameter_count > config.max_parameters {
        plan.notes.push(truncation_note(
            Axis::Parameters,
            config.max_parameters,
            parameter_count,
        ));
    }

    let mut gene_axis = DiscoveredAxis::new(Axis::Genes, config.max_genes);
    for key in &parameters {
        let contexts = by_parameter(store, key, threshold).await?;
        let genes = gene_axis.admit(contexts.iter().map(|c| c.gene_id.clone()).collect());
        for ctx in contexts.iter().filter(|c| genes.contains(&c.gene_id)) {
            plan.pairs.push(ExportPair::new(ctx, key));
        }
    }
    plan.notes.extend(gene_axis.note());
    Ok(plan)
}

/// Fixed gene list; the parameter axis is discovered per gene from its
/// significant annotations and applied to every context of that gene.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if context resolution or a
/// significance lookup fails.
pub async fn plan_significant_parameters<S: MeasurementStore>(
    store: &S,
    gene_ids: &[String],
    threshold: f64,
    config: &ExportConfig,
) -> Result<ExportPlan, EngineError> {
    let (genes, gene_count) = cap_axis(gene_ids, config.max_genes);
    let mut plan = ExportPlan::default();
    if genes.is_empty() {
        return Ok(plan);
    }
    if gene_count > config.max_genes {
        plan.notes
            .push(truncation_note(Axis::Genes, config.max_genes, gene_count));
    }

    let by_gene = contexts_by_gene(store.contexts_for_genes(&genes).await?);
    let mut parameter_axis = DiscoveredAxis::new(Axis::Parameters, config.max_parameters);
    for gene in &genes {
        let Some(contexts) = by_gene.get(gene) else {
            continue;
        };
        let parameters = parameter_axis.admit(by_context(store, gene, threshold).await?);
        for ctx in contexts {
            for key in &parameters {
                plan.pairs.push(ExportPair::new(ctx, key));
            }
        }
    }
    plan.notes.extend(parameter_axis.note());
    Ok(plan)
}

/// Process pairs on at most `workers` concurrent tasks.
///
/// Results keep the order of `pairs`. Pairs with no protocol instance are
/// omitted. A pair whose retrieval fails is logged and omitted; it never
/// fails the export.
pub async fn run_pairs<S: MeasurementStore>(
    store: Arc<S>,
    pairs: Vec<ExportPair>,
    include_baseline: bool,
    workers: usize,
) -> Vec<PairResult> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut slots: Vec<Option<PairResult>> = vec![None; pairs.len()];
    let mut join_set = JoinSet::new();

    for (idx, pair) in pairs.into_iter().enumerate() {
        let store = Arc::clone(&store);
        let semaphore = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let result = locate_and_fetch(
                store.as_ref(),
                &pair.context,
                &pair.parameter_key,
                include_baseline,
            )
            .await;
            (idx, pair, result)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, pair, Ok(Some(data)))) => {
                slots[idx] = Some(PairResult::new(&pair.context, &pair.parameter_key, data));
            }
            Ok((_, pair, Ok(None))) => {
                tracing::debug!(
                    gene_id = %pair.context.gene_id,
                    genotype_id = pair.context.genotype_id,
                    parameter = %pair.parameter_key,
                    "no data for pair"
                );
            }
            Ok((_, pair, Err(e))) => {
                tracing::warn!(
                    gene_id = %pair.context.gene_id,
                    genotype_id = pair.context.genotype_id,
                    parameter = %pair.parameter_key,
                    error = %e,
                    "dropping pair after store failure"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping pair after worker failure");
            }
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{Call, RecordingStore, candidate, context, measurement};

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i:02}")).collect()
    }

    fn config() -> ExportConfig {
        ExportConfig::default()
    }

    #[test]
    fn cap_axis_dedups_before_truncating() {
        let mut input = ids("MGI:", 25);
        input.extend(ids("MGI:", 5));
        input.push("  ".to_string());

        let (kept, distinct_count) = cap_axis(&input, 20);

        assert_eq!(distinct_count, 25);
        assert_eq!(kept, ids("MGI:", 20));
    }

    #[test]
    fn discovered_axis_caps_the_union() {
        let mut axis = DiscoveredAxis::new(Axis::Genes, 2);
        assert_eq!(axis.admit(vec![1, 2]), vec![1, 2]);
        assert_eq!(axis.admit(vec![3, 2, 1, 2]), vec![2, 1]);
        assert_eq!(axis.admit(vec![4]), Vec::<i32>::new());
        let note = axis.note().unwrap();
        assert!(note.contains("only 2 genes"));
        assert!(note.ends_with("of 4."));
    }

    #[test]
    fn discovered_axis_within_cap_has_no_note() {
        let mut axis = DiscoveredAxis::new(Axis::Parameters, 3);
        assert_eq!(axis.admit(vec!["P1", "P2"]), vec!["P1", "P2"]);
        assert_eq!(axis.admit(vec!["P2", "P3"]), vec!["P2", "P3"]);
        assert_eq!(axis.note(), None);
    }

    #[tokio::test]
    async fn twenty_five_genes_yield_twenty_and_one_note() {
        let genes = ids("MGI:", 25);
        let contexts: Vec<_> = genes
            .iter()
            .enumerate()
            .map(|(i, g)| context(g, 100 + i64::try_from(i).unwrap()))
            .collect();
        let store = RecordingStore::default().with_contexts(contexts);

        let plan = plan_bulk(&store, &genes, &["IMPC_BWT_008_001".to_string()], &config())
            .await
            .unwrap();

        let planned: Vec<&str> = plan.pairs.iter().map(|p| p.context.gene_id.as_str()).collect();
        assert_eq!(planned.len(), 20);
        assert_eq!(planned, ids("MGI:", 20).iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(plan.notes.len(), 1);
        assert!(plan.notes[0].contains("20"));
        assert!(plan.notes[0].contains("25"));
    }

    #[tokio::test]
    async fn bulk_plan_is_gene_major() {
        let store = RecordingStore::default().with_contexts(vec![
            context("MGI:2", 44),
            context("MGI:1", 42),
            context("MGI:1", 43),
        ]);
        let genes = vec!["MGI:1".to_string(), "MGI:2".to_string(), "MGI:1".to_string()];
        let params = vec!["P1".to_string(), "P2".to_string()];

        let plan = plan_bulk(&store, &genes, &params, &config()).await.unwrap();

        let order: Vec<(i64, &str)> = plan
            .pairs
            .iter()
            .map(|p| (p.context.genotype_id, p.parameter_key.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(42, "P1"), (42, "P2"), (43, "P1"), (43, "P2"), (44, "P1"), (44, "P2")]
        );
        assert!(plan.notes.is_empty());
    }

    #[tokio::test]
    async fn empty_axis_plans_nothing() {
        let store = RecordingStore::default();
        let plan = plan_bulk(&store, &[], &["P1".to_string()], &config())
            .await
            .unwrap();
        assert!(plan.pairs.is_empty());
        assert!(plan.notes.is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn bulk_plan_notes_each_exceeded_axis_once() {
        let store = RecordingStore::default().with_contexts(vec![context("MGI:1", 42)]);
        let genes = vec!["MGI:1".to_string(), "MGI:2".to_string(), "MGI:3".to_string()];
        let params = vec!["P1".to_string(), "P2".to_string(), "P3".to_string(), "P1".to_string()];
        let config = ExportConfig {
            max_genes: 2,
            max_parameters: 2,
            ..ExportConfig::default()
        };

        let plan = plan_bulk(&store, &genes, &params, &config).await.unwrap();

        assert_eq!(plan.notes.len(), 2);
        assert!(plan.notes[0].contains("only 2 genes"));
        assert!(plan.notes[0].ends_with("of 3."));
        assert!(plan.notes[1].contains("only 2 parameters"));
        assert!(plan.notes[1].ends_with("of 3."));
        assert_eq!(store.calls(), vec![Call::Contexts(vec!["MGI:1".into(), "MGI:2".into()])]);
        let keys: Vec<&str> = plan.pairs.iter().map(|p| p.parameter_key.as_str()).collect();
        assert_eq!(keys, vec!["P1", "P2"]);
    }

    #[tokio::test]
    async fn significant_genes_caps_gene_axis_across_parameters() {
        let mut store = RecordingStore::default();
        for i in 0..4 {
            store = store.with_annotation(context(&format!("MGI:{i}"), 40 + i), "P1", Some(1e-6));
        }
        store = store
            .with_annotation(context("MGI:9", 49), "P2", Some(1e-6))
            .with_annotation(context("MGI:1", 41), "P2", Some(1e-6));
        let config = ExportConfig {
            max_genes: 3,
            ..ExportConfig::default()
        };

        let plan = plan_significant_genes(
            &store,
            &["P1".to_string(), "P2".to_string()],
            1e-4,
            &config,
        )
        .await
        .unwrap();

        let order: Vec<(i64, &str)> = plan
            .pairs
            .iter()
            .map(|p| (p.context.genotype_id, p.parameter_key.as_str()))
            .collect();
        // MGI:9 arrives after the gene axis is full; MGI:1 was already admitted.
        assert_eq!(order, vec![(40, "P1"), (41, "P1"), (42, "P1"), (41, "P2")]);
        assert_eq!(plan.notes.len(), 1);
        assert!(plan.notes[0].contains("only 3 genes"));
        assert!(plan.notes[0].ends_with("of 5."));
    }

    #[tokio::test]
    async fn disjoint_discoveries_share_one_gene_cap() {
        let mut store = RecordingStore::default();
        for i in 0..20 {
            store = store
                .with_annotation(context(&format!("MGI:A{i:02}"), 100 + i), "P1", Some(1e-6))
                .with_annotation(context(&format!("MGI:B{i:02}"), 200 + i), "P2", Some(1e-6));
        }

        let plan = plan_significant_genes(
            &store,
            &["P1".to_string(), "P2".to_string()],
            1e-4,
            &config(),
        )
        .await
        .unwrap();

        let genes: HashSet<&str> = plan.pairs.iter().map(|p| p.context.gene_id.as_str()).collect();
        assert_eq!(genes.len(), 20);
        assert!(genes.iter().all(|g| g.starts_with("MGI:A")));
        assert!(plan.pairs.iter().all(|p| p.parameter_key == "P1"));
        assert_eq!(plan.notes.len(), 1);
        assert!(plan.notes[0].contains("only 20 genes"));
        assert!(plan.notes[0].ends_with("of 40."));
    }

    #[tokio::test]
    async fn significant_parameters_caps_parameter_axis_across_genes() {
        let store = RecordingStore::default()
            .with_annotation(context("MGI:1", 42), "P1", Some(1e-6))
            .with_annotation(context("MGI:1", 42), "P2", Some(1e-6))
            .with_annotation(context("MGI:2", 44), "P3", Some(1e-6))
            .with_annotation(context("MGI:2", 44), "P1", Some(1e-6));
        let config = ExportConfig {
            max_parameters: 2,
            ..ExportConfig::default()
        };

        let plan = plan_significant_parameters(
            &store,
            &["MGI:1".to_string(), "MGI:2".to_string()],
            1e-4,
            &config,
        )
        .await
        .unwrap();

        let order: Vec<(i64, &str)> = plan
            .pairs
            .iter()
            .map(|p| (p.context.genotype_id, p.parameter_key.as_str()))
            .collect();
        assert_eq!(order, vec![(42, "P1"), (42, "P2"), (44, "P1")]);
        assert_eq!(plan.notes.len(), 1);
        assert!(plan.notes[0].contains("only 2 parameters"));
        assert!(plan.notes[0].ends_with("of 3."));
    }

    #[tokio::test]
    async fn significant_parameters_applies_to_every_context_of_gene() {
        let store = RecordingStore::default()
            .with_contexts(vec![context("MGI:1", 43)])
            .with_annotation(context("MGI:1", 42), "P2", Some(1e-6))
            .with_annotation(context("MGI:1", 42), "P1", Some(1e-6))
            .with_annotation(context("MGI:1", 42), "P3", Some(0.2));

        let plan = plan_significant_parameters(&store, &["MGI:1".to_string()], 1e-4, &config())
            .await
            .unwrap();

        let order: Vec<(i64, &str)> = plan
            .pairs
            .iter()
            .map(|p| (p.context.genotype_id, p.parameter_key.as_str()))
            .collect();
        assert_eq!(order, vec![(43, "P2"), (43, "P1"), (42, "P2"), (42, "P1")]);
    }

    fn pool_store() -> RecordingStore {
        RecordingStore::default()
            .with_candidates(42, "P1", vec![candidate(9, "mg-a", 1)])
            .with_candidates(43, "P1", vec![candidate(9, "mg-a", 1)])
            .with_candidates(42, "P2", vec![candidate(9, "mg-a", 1)])
            .with_mutants(42, vec![measurement(1, "mg-a", false)])
            .with_mutants(43, vec![measurement(2, "mg-a", false)])
            .with_metadata("mg-a", "Equipment = A")
    }

    #[tokio::test]
    async fn results_follow_enumeration_order() {
        let store = Arc::new(pool_store().with_delay(Duration::from_millis(5)));
        let pairs = vec![
            ExportPair::new(&context("MGI:1", 42), "P1"),
            ExportPair::new(&context("MGI:1", 42), "P2"),
            ExportPair::new(&context("MGI:1", 42), "P3"),
            ExportPair::new(&context("MGI:2", 43), "P1"),
        ];

        let results = run_pairs(Arc::clone(&store), pairs, false, 4).await;

        let order: Vec<(i64, &str)> = results
            .iter()
            .map(|r| (r.genotype_id, r.parameter_key.as_str()))
            .collect();
        // P3 has no protocol instance and is dropped, but was still attempted.
        assert_eq!(order, vec![(42, "P1"), (42, "P2"), (43, "P1")]);
        assert_eq!(store.locate_calls().len(), 4);
    }

    #[tokio::test]
    async fn failing_pair_is_dropped_not_fatal() {
        let store = Arc::new(pool_store().failing_on("P2"));
        let pairs = vec![
            ExportPair::new(&context("MGI:1", 42), "P1"),
            ExportPair::new(&context("MGI:1", 42), "P2"),
            ExportPair::new(&context("MGI:2", 43), "P1"),
        ];

        let results = run_pairs(store, pairs, false, 2).await;

        let order: Vec<(i64, &str)> = results
            .iter()
            .map(|r| (r.genotype_id, r.parameter_key.as_str()))
            .collect();
        assert_eq!(order, vec![(42, "P1"), (43, "P1")]);
    }

    #[tokio::test]
    async fn pool_is_bounded_by_worker_count() {
        let store = Arc::new(pool_store().with_delay(Duration::from_millis(20)));
        let pairs: Vec<_> = (0..12)
            .map(|i| ExportPair::new(&context("MGI:1", 42), &format!("P{i}")))
            .collect();

        run_pairs(Arc::clone(&store), pairs, false, 3).await;

        assert!(store.max_in_flight() <= 3);
        assert!(store.max_in_flight() >= 1);
    }
}
