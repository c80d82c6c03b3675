//! Code fence tracking.
//!
//! Directive markers inside fenced code blocks are literal text, so the
//! preprocessor feeds every line through a [`FenceTracker`] first.

/// An open code fence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

/// Tracks whether the current line is inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` if it opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some(fence) => {
                let Some(found) = fence_prefix(trimmed) else {
                    return false;
                };
                let closes = found.marker == fence.marker
                    && found.len >= fence.len
                    && trimmed[found.len..].trim().is_empty();
                if closes {
                    self.open = None;
                }
                closes
            }
            None => {
                self.open = fence_prefix(trimmed);
                self.open.is_some()
            }
        }
    }
}

/// Run of three or more backticks or tildes at the start of `trimmed`.
fn fence_prefix(trimmed: &str) -> Option<Fence> {
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    (len >= 3).then_some(Fence { marker, len })
}
