use std::sync::{Arc, Mutex, MutexGuard};

use swash::scale::ScaleContext;

/// Process-wide scaling context handle.
///
/// swash's `ScaleContext` carries outline and hinting caches that want to
/// be shared across every face. The handle is cloned into each face
/// instead of living in module state, so embedders control its lifetime;
/// rasterization locks it for the duration of one glyph.
#[derive(Clone)]
pub struct FontLibrary {
    context: Arc<Mutex<ScaleContext>>,
}

impl FontLibrary {
    pub fn new() -> FontLibrary {
        FontLibrary {
            context: Arc::new(Mutex::new(ScaleContext::new())),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ScaleContext> {
        self.context.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary").finish_non_exhaustive()
    }
}
