//! Dataset-reference resolution.
//!
//! A call to the dataset-construction name (`EventDataset` by default) does
//! not lower to a call. It becomes an expression that opens the referenced
//! files lazily once it is evaluated:
//!
//! ```text
//! EventDataset('root://host//data/f.root', 'events')
//! ```
//!
//! lowers to
//!
//! ```text
//! (lambda input_files: uproot.lazyarrays(input_files, TREE))(
//!     input_filenames if input_filenames is not None else ['host//data/f.root'])
//! ```
//!
//! where `TREE` prefers the runtime `tree_name`, then the literal name
//! argument, then the first tree found in the first input file.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::{
    ast::{Node, NodeId},
    config::LoweringConfig,
    error::{LowerError, Result},
    literal,
    lowering::Lowerer,
};

/// Generic URI syntax: `scheme:` `//authority` path `?query` `#fragment`.
static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("URI pattern is valid")
});

/// Schemes whose last path segment may carry `;params`.
const PARAM_SCHEMES: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip", "sips",
    "mms", "sftp", "tel",
];

/// Reduces a source location to the part the columnar backend opens: the
/// URI with its scheme and delimiters stripped.
///
/// For schemes that use path parameters the `;` before them is a delimiter
/// too, so it is dropped along with the others.
///
/// # Examples
///
/// ```
/// use funcadl_lower::dataset::source_path;
///
/// assert_eq!(source_path("root://eos.cern.ch//data/f.root"), "eos.cern.ch//data/f.root");
/// assert_eq!(source_path("file:///tmp/f.root"), "/tmp/f.root");
/// assert_eq!(source_path("tests/f.root"), "tests/f.root");
/// assert_eq!(source_path("http://host/f.root;v=2"), "host/f.rootv=2");
/// ```
pub fn source_path(location: &str) -> String {
    let Some(caps) = URI.captures(location) else {
        return location.to_string();
    };

    let scheme = caps.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
    let mut reduced: String = caps.get(2).map_or("", |m| m.as_str()).to_string();
    let path = caps.get(3).map_or("", |m| m.as_str());
    match params_delimiter(path).filter(|_| PARAM_SCHEMES.contains(&scheme.as_str())) {
        Some(i) => {
            reduced.push_str(&path[..i]);
            reduced.push_str(&path[i + 1..]);
        }
        None => reduced.push_str(path),
    }
    (4..=5)
        .filter_map(|i| caps.get(i))
        .for_each(|m| reduced.push_str(m.as_str()));
    reduced
}

/// Position of the `;` that starts path parameters: the first one after the
/// last `/`, or the first one at all when the path has no `/`.
fn params_delimiter(path: &str) -> Option<usize> {
    match path.rfind('/') {
        Some(slash) => path[slash..].find(';').map(|i| slash + i),
        None => path.find(';'),
    }
}

/// Where the source locations come from at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sources {
    /// Only the runtime override
    Runtime,
    /// The runtime override, falling back to these paths
    Literal(Vec<String>),
}

/// Where the tree name comes from at evaluation time, after the runtime
/// override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeName {
    /// Lowered name argument
    Explicit(String),
    /// First tree of the first source
    Discover,
}

/// A resolved dataset-construction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReference {
    pub sources: Sources,
    pub tree_name: TreeName,
}

impl DatasetReference {
    /// Renders the expression yielding the lazy columnar table.
    pub fn render(&self, config: &LoweringConfig) -> String {
        let input = &config.input_filenames_name;
        let source_rep = match &self.sources {
            Sources::Runtime => input.clone(),
            Sources::Literal(paths) => format!(
                "{input} if {input} is not None else {}",
                literal::render_str_list(paths)
            ),
        };

        let local_tree_rep = match &self.tree_name {
            TreeName::Explicit(rep) => rep.clone(),
            TreeName::Discover => format!(
                "(lambda key_array: key_array[key_array[:, 1] == {}][:, 0])\
                 ({}.{}(uproot.open(input_files[0]).classnames()).unzip()[0])[0]",
                literal::render_str(&config.tree_class),
                config.record_module,
                config.record_constructor,
            ),
        };
        let tree = &config.tree_name_name;
        let tree_rep = format!("({tree} if {tree} is not None else {local_tree_rep})");

        let tree_arg = if config.log_tree_name {
            format!(
                "logging.getLogger(__name__).info('Using treename=' + repr({tree_rep})) or {tree_rep}"
            )
        } else {
            tree_rep
        };

        format!("(lambda input_files: uproot.lazyarrays(input_files, {tree_arg}))({source_rep})")
    }
}

impl Lowerer<'_> {
    pub(crate) fn lower_dataset_call(&mut self, args: &[NodeId]) -> Result<String> {
        let reference = self.resolve_dataset(args)?;
        trace!(?reference, "resolved dataset reference");
        Ok(reference.render(self.config))
    }

    fn resolve_dataset(&mut self, args: &[NodeId]) -> Result<DatasetReference> {
        if args.len() > 2 {
            return Err(LowerError::OperatorArity {
                operator: format!("{}()", self.config.dataset_call),
                expected: "no more than 2".to_string(),
                found: args.len(),
            });
        }

        let sources = match args.first() {
            Some(&arg) => {
                let locations = self.source_locations(arg)?;
                if self.config.single_source && locations.len() > 1 {
                    return Err(LowerError::MalformedQuery(format!(
                        "{}() supports a single source, found {}",
                        self.config.dataset_call,
                        locations.len()
                    )));
                }
                Sources::Literal(locations.iter().map(|l| source_path(l)).collect())
            }
            None => Sources::Runtime,
        };

        let tree_name = match args.get(1) {
            Some(&arg) => TreeName::Explicit(self.lower(arg)?),
            None => TreeName::Discover,
        };

        Ok(DatasetReference { sources, tree_name })
    }

    /// String literals named by the source argument.
    fn source_locations(&self, arg: NodeId) -> Result<Vec<String>> {
        let elements = match self.arena.get(arg) {
            Node::List(elements) | Node::Tuple(elements) => elements.clone(),
            _ => vec![arg],
        };

        elements
            .into_iter()
            .map(|id| match self.arena.get(id) {
                Node::String(location) => Ok(location.clone()),
                other => Err(LowerError::MalformedQuery(format!(
                    "source locations of {}() must be string literals, found {}",
                    self.config.dataset_call,
                    other.kind_name()
                ))),
            })
            .collect()
    }
}
