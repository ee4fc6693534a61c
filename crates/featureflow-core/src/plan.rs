//! Environment plan: a DAG of resource specifications
//!
//! A plan is validated once when it is assembled and is immutable
//! afterwards. Creation order is computed with Kahn's algorithm; when
//! several resources are ready at once the one declared first wins, so the
//! order is stable for identical inputs.

use crate::error::{Result, ValidationError};
use crate::model::{
    AttributeRef, ExternalKind, ExternalReference, ExternalReferenceSet, FeatureIdentity,
    RefTarget, ResourceKind, ResourceSpec,
};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

/// Compute-service identifiers handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeOutput {
    pub name: String,
    pub logical_name: String,
    /// In-mesh URL inside the hosting environment
    pub internal_url: String,
}

/// Values the plan produces for calling collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutputs {
    /// `https://{identity}.{dnsZoneName}`
    pub feature_url: String,

    /// Record name the external DNS step creates under the zone
    pub dns_record_name: String,

    /// Edge endpoint hostname, known once the endpoint exists
    pub endpoint_hostname: AttributeRef,

    pub compute: Vec<ComputeOutput>,
}

/// Immutable provisioning plan for one feature environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentPlan {
    feature: FeatureIdentity,
    resources: Vec<ResourceSpec>,
    externals: BTreeMap<ExternalKind, ExternalReference>,
    creation_order: Vec<String>,
    outputs: PlanOutputs,
}

impl EnvironmentPlan {
    /// Validate the graph and freeze it
    ///
    /// Checks: logical names are unique, every dependency names a planned
    /// resource, every reference to a planned resource is covered by a
    /// dependency edge, every external reference read is in the snapshot,
    /// and the graph is acyclic.
    pub fn assemble(
        feature: FeatureIdentity,
        resources: Vec<ResourceSpec>,
        refs: &ExternalReferenceSet,
        outputs: PlanOutputs,
    ) -> Result<Self> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(resources.len());
        for (idx, spec) in resources.iter().enumerate() {
            if index.insert(spec.logical_name.as_str(), idx).is_some() {
                return Err(ValidationError::DuplicateResource(spec.logical_name.clone()));
            }
        }

        let mut externals = BTreeMap::new();
        for spec in &resources {
            for dep in &spec.depends_on {
                if !index.contains_key(dep.as_str()) {
                    return Err(ValidationError::UnknownDependency {
                        resource: spec.logical_name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }

            let mut read = spec.reads.clone();
            for r in spec.attribute_refs() {
                match &r.target {
                    RefTarget::Resource(name) if !spec.has_dependency(name) => {
                        return Err(ValidationError::UndeclaredReference {
                            resource: spec.logical_name.clone(),
                            target: r.target.to_string(),
                        });
                    }
                    RefTarget::Resource(_) => {}
                    RefTarget::External(kind) => {
                        read.insert(*kind);
                    }
                }
            }

            for kind in read {
                let reference = refs.require(kind)?;
                externals.insert(kind, reference.clone());
            }
        }

        let order = topological_order(&resources, &index)?;
        let creation_order = order
            .iter()
            .map(|&i| resources[i].logical_name.clone())
            .collect();

        Ok(Self {
            feature,
            resources,
            externals,
            creation_order,
            outputs,
        })
    }

    pub fn feature(&self) -> &FeatureIdentity {
        &self.feature
    }

    /// Resources in declaration order
    pub fn resources(&self) -> &[ResourceSpec] {
        &self.resources
    }

    pub fn resource(&self, logical_name: &str) -> Option<&ResourceSpec> {
        self.resources
            .iter()
            .find(|r| r.logical_name == logical_name)
    }

    pub fn by_kind(&self, kind: ResourceKind) -> Vec<&ResourceSpec> {
        self.resources.iter().filter(|r| r.kind == kind).collect()
    }

    /// External references this plan reads, resolved from the snapshot
    pub fn externals(&self) -> impl Iterator<Item = &ExternalReference> {
        self.externals.values()
    }

    pub fn outputs(&self) -> &PlanOutputs {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Topological creation order
    pub fn creation_order(&self) -> Vec<&ResourceSpec> {
        self.creation_order
            .iter()
            .filter_map(|name| self.resource(name))
            .collect()
    }

    /// Position of a resource in the creation order
    pub fn position(&self, logical_name: &str) -> Option<usize> {
        self.creation_order.iter().position(|n| n == logical_name)
    }

    /// Group resources into levels; everything in a level can be created
    /// in parallel once the previous levels exist.
    pub fn waves(&self) -> Vec<Vec<&ResourceSpec>> {
        let mut level: HashMap<&str, usize> = HashMap::new();
        let mut waves: Vec<Vec<&ResourceSpec>> = Vec::new();

        for spec in self.creation_order() {
            let depth = spec
                .depends_on
                .iter()
                .filter_map(|d| level.get(d.as_str()))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            level.insert(spec.logical_name.as_str(), depth);

            if waves.len() <= depth {
                waves.resize_with(depth + 1, Vec::new);
            }
            waves[depth].push(spec);
        }

        waves
    }

    pub fn summary(&self) -> PlanSummary {
        let mut counts = BTreeMap::new();
        for spec in &self.resources {
            *counts.entry(spec.kind).or_insert(0) += 1;
        }
        PlanSummary {
            feature: self.feature.to_string(),
            total: self.resources.len(),
            externals: self.externals.len(),
            waves: self.waves().len(),
            counts,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Kahn's algorithm; ties resolved by declaration index
fn topological_order(resources: &[ResourceSpec], index: &HashMap<&str, usize>) -> Result<Vec<usize>> {
    let n = resources.len();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree: Vec<usize> = vec![0; n];

    for (idx, spec) in resources.iter().enumerate() {
        for dep in &spec.depends_on {
            if let Some(&dep_idx) = index.get(dep.as_str()) {
                dependents[dep_idx].push(idx);
                in_degree[idx] += 1;
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for &next in &dependents[idx] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() != n {
        let stuck: Vec<&str> = (0..n)
            .filter(|i| in_degree[*i] > 0)
            .map(|i| resources[i].logical_name.as_str())
            .collect();
        return Err(ValidationError::CircularDependency(stuck.join(", ")));
    }

    Ok(order)
}

/// Resource counts per kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub feature: String,
    pub total: usize,
    pub externals: usize,
    pub waves: usize,
    pub counts: BTreeMap<ResourceKind, usize>,
}

impl PlanSummary {
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} resources in {} waves, {} external references",
            self.feature, self.total, self.waves, self.externals
        )
    }
}
