use std::collections::HashMap;

/// Identifiers bound by the lambdas currently being lowered.
///
/// Bindings are organised as a stack of frames, one per lambda. A name may be
/// bound by several frames at once (nested lambdas reusing a parameter name),
/// so each name carries the number of frames that bind it. Names whose count
/// drops to zero are removed from the table.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    frames: Vec<Vec<String>>,
    counts: HashMap<String, usize>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame binding `names`.
    pub fn bind<S: AsRef<str>>(&mut self, names: &[S]) {
        let frame: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        for name in &frame {
            *self.counts.entry(name.clone()).or_insert(0) += 1;
        }
        self.frames.push(frame);
    }

    /// Pops the innermost frame and returns the names it bound.
    pub fn unbind(&mut self) -> Option<Vec<String>> {
        let frame = self.frames.pop()?;
        for name in &frame {
            if let Some(count) = self.counts.get_mut(name) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(name);
                }
            }
        }
        Some(frame)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Number of frames binding `name`.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
