//! Dependency ordering.

use crate::error::WorkflowError;
use crate::step::WorkflowStep;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Orders steps so that every step comes after all of its dependencies.
///
/// Depth-first visitation driven by the original list order, so the result
/// is deterministic and independent steps keep their first-seen order.
/// Dependency ids that match no step are ignored.
///
/// # Errors
///
/// [`WorkflowError::CyclicDependency`] naming the step at which the cycle
/// was detected.
///
/// # Examples
///
/// ```
/// use toolflow_core::{resolve_order, WorkflowStep};
///
/// let steps = vec![
///     WorkflowStep::new("reply", "Reply", "writer").depends_on("analyze"),
///     WorkflowStep::new("analyze", "Analyze", "sentiment"),
/// ];
///
/// let order: Vec<_> = resolve_order(&steps)?
///     .iter()
///     .map(|s| s.id.as_str())
///     .collect();
/// assert_eq!(order, vec!["analyze", "reply"]);
/// # Ok::<(), toolflow_core::WorkflowError>(())
/// ```
pub fn resolve_order(steps: &[WorkflowStep]) -> Result<Vec<&WorkflowStep>, WorkflowError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        index.entry(step.id.as_str()).or_insert(i);
    }

    let mut resolver = Resolver {
        steps,
        index,
        marks: HashMap::with_capacity(steps.len()),
        sorted: Vec::with_capacity(steps.len()),
        stack: Vec::new(),
    };

    for i in 0..steps.len() {
        resolver.visit(i)?;
    }

    Ok(resolver.sorted)
}

struct Resolver<'a> {
    steps: &'a [WorkflowStep],
    index: HashMap<&'a str, usize>,
    marks: HashMap<usize, Mark>,
    sorted: Vec<&'a WorkflowStep>,
    /// Pending visits as `(step index, next dependency to look at)`.
    stack: Vec<(usize, usize)>,
}

impl<'a> Resolver<'a> {
    /// Visits `root` and everything it depends on, without recursion so that
    /// deep chains cannot exhaust the thread stack.
    fn visit(&mut self, root: usize) -> Result<(), WorkflowError> {
        if !self.enter(root)? {
            return Ok(());
        }

        let steps = self.steps;
        while let Some(frame) = self.stack.last_mut() {
            let (i, cursor) = *frame;
            let deps = &steps[i].depends_on;

            if cursor < deps.len() {
                frame.1 += 1;
                if let Some(&d) = self.index.get(deps[cursor].as_str()) {
                    self.enter(d)?;
                }
            } else {
                self.stack.pop();
                self.marks.insert(i, Mark::Done);
                self.sorted.push(&steps[i]);
            }
        }
        Ok(())
    }

    /// Marks `i` in progress and schedules it. Returns `false` if it is
    /// already done.
    fn enter(&mut self, i: usize) -> Result<bool, WorkflowError> {
        match self.marks.get(&i) {
            Some(Mark::InProgress) => {
                Err(WorkflowError::CyclicDependency(self.steps[i].id.clone()))
            }
            Some(Mark::Done) => Ok(false),
            None => {
                self.marks.insert(i, Mark::InProgress);
                self.stack.push((i, 0));
                Ok(true)
            }
        }
    }
}
