//! Lowering configuration.
//!
//! Every field has a default, so a configuration file only needs to mention
//! what it changes:
//!
//! ```json
//! {"single_source": true, "max_depth": 128}
//! ```

use serde::{Deserialize, Serialize};

/// Knobs of a lowering pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoweringConfig {
    /// Callee name that marks a dataset-construction call
    pub dataset_call: String,

    /// Evaluation-time identifier overriding the source locations
    pub input_filenames_name: String,

    /// Evaluation-time identifier overriding the tree name
    pub tree_name_name: String,

    /// Module holding the structured-record constructor
    pub record_module: String,

    /// Structured-record constructor, looked up on `record_module`
    pub record_constructor: String,

    /// Method removing one level of nesting
    pub flatten_method: String,

    /// Class name of the collections picked by tree-name discovery
    pub tree_class: String,

    /// Reject dataset references naming more than one source
    pub single_source: bool,

    /// Log the chosen tree name when the emitted expression runs
    pub log_tree_name: bool,

    /// Deepest node nesting a pass will descend into
    pub max_depth: usize,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        LoweringConfig {
            dataset_call: "EventDataset".to_string(),
            input_filenames_name: "input_filenames".to_string(),
            tree_name_name: "tree_name".to_string(),
            record_module: "awkward".to_string(),
            record_constructor: "Table".to_string(),
            flatten_method: "flatten".to_string(),
            tree_class: "TTree".to_string(),
            single_source: false,
            log_tree_name: true,
            max_depth: 256,
        }
    }
}

impl LoweringConfig {
    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Identifiers the emitted expression reads as runtime overrides.
    pub fn runtime_overrides(&self) -> Vec<String> {
        vec![
            self.input_filenames_name.clone(),
            self.tree_name_name.clone(),
        ]
    }
}
