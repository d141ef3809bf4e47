//! Deduplication of grids across terminal surfaces.
//!
//! Surfaces with identical font configuration share one [`SharedGrid`],
//! keyed by a fingerprint of everything grid-defining and reference
//! counted at surface lifecycle boundaries. The set itself is not thread
//! safe; acquire and release happen on the control thread, and the
//! returned grid pointer may then be shared freely.

use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use compact_str::CompactString;
use glyphgrid_data::Style;
use rustc_hash::{FxHashMap, FxHasher};
use tracing::{debug, info, warn};

use crate::{
    backend::{Backend, Descriptor, Discover},
    collection::{Collection, Entry, LoadOptions},
    config::{GridConfig, StylePreference},
    error::Error,
    grid::{GridOptions, SharedGrid},
    resolver::CodepointResolver,
};

/// Fingerprint of a grid-defining configuration.
///
/// Keys compare by hash value alone: two configurations hashing equal are
/// treated as the same grid. The hasher is deterministic, so fingerprints
/// are stable across runs for identical input ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey(u64);

impl GridKey {
    pub fn new(config: &GridConfig) -> GridKey {
        let mut hasher = FxHasher::default();
        for style in Style::ALL {
            config.families(style).hash(&mut hasher);
            config.style_preference(style).hash(&mut hasher);
        }
        config.size.to_bits().hash(&mut hasher);
        config.variations.hash(&mut hasher);
        config.codepoint_map.hash(&mut hasher);
        config.synthetic.hash(&mut hasher);
        config.load_flags.hash(&mut hasher);
        config.metric_modifiers.hash(&mut hasher);
        GridKey(hasher.finish())
    }
}

struct GridRef<B: Backend, D> {
    grid: Arc<SharedGrid<B, D>>,
    refs: usize,
}

/// Refcounted registry of [`SharedGrid`]s, keyed by configuration.
///
/// Owns the process-wide rasterizer library handle; the discovery handle
/// is created lazily on first use because some platform backends cannot be
/// re-initialized.
pub struct SharedGridSet<B: Backend, D> {
    library: B::Library,
    discovery: Option<Arc<D>>,
    grids: FxHashMap<GridKey, GridRef<B, D>>,
}

impl<B: Backend, D: Discover<B>> SharedGridSet<B, D> {
    pub fn new(library: B::Library) -> SharedGridSet<B, D> {
        SharedGridSet {
            library,
            discovery: None,
            grids: FxHashMap::default(),
        }
    }

    /// Number of live grids.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Returns the grid for a configuration, building it on first use.
    ///
    /// Every `acquire` must be paired with a [`SharedGridSet::release`] of
    /// the returned key.
    pub fn acquire(
        &mut self,
        config: &GridConfig,
    ) -> Result<(GridKey, Arc<SharedGrid<B, D>>), Error> {
        let key = GridKey::new(config);
        if let Some(entry) = self.grids.get_mut(&key) {
            entry.refs += 1;
            debug!(?key, refs = entry.refs, "reusing shared grid");
            return Ok((key, Arc::clone(&entry.grid)));
        }

        let grid = Arc::new(self.build_grid(config)?);
        info!(?key, size = config.size, "built shared grid");
        self.grids.insert(key, GridRef { grid: Arc::clone(&grid), refs: 1 });
        Ok((key, grid))
    }

    /// Drops one reference; the grid is destroyed when the count reaches
    /// zero. There is no grace period.
    pub fn release(&mut self, key: GridKey) {
        let Some(entry) = self.grids.get_mut(&key) else {
            warn!(?key, "release of unknown grid key");
            return;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            debug!(?key, "destroying shared grid");
            self.grids.remove(&key);
        }
    }

    fn discovery(&mut self) -> Result<Arc<D>, Error> {
        if let Some(discovery) = &self.discovery {
            return Ok(Arc::clone(discovery));
        }
        let discovery = Arc::new(D::init()?);
        self.discovery = Some(Arc::clone(&discovery));
        Ok(discovery)
    }

    fn build_grid(&mut self, config: &GridConfig) -> Result<SharedGrid<B, D>, Error> {
        let discovery = self.discovery()?;
        let mut collection = Collection::new_with_load_options(LoadOptions {
            library: self.library.clone(),
            size: config.size,
            metric_modifiers: config.metric_modifiers,
            flags: config.load_flags,
        });

        // User-configured families, per style, in priority order.
        for style in Style::ALL {
            for family in config.families(style) {
                let descriptor = user_descriptor(config, style, family);
                match discovery.discover(&descriptor) {
                    Ok(mut faces) if !faces.is_empty() => {
                        collection.add(style, Entry::Deferred(faces.remove(0)))?;
                    },
                    Ok(_) => warn!(%family, ?style, "configured font family not found"),
                    Err(error) => warn!(%family, %error, "font discovery failed"),
                }
            }
        }

        // Built-in fallbacks: a monospace text face, the platform's
        // preferred color emoji face, and a monochrome emoji face.
        for descriptor in builtin_fallbacks(config.size) {
            match discovery.discover(&descriptor) {
                Ok(mut faces) if !faces.is_empty() => {
                    collection.add(Style::Regular, Entry::FallbackDeferred(faces.remove(0)))?;
                },
                Ok(_) => debug!(?descriptor, "built-in fallback not present"),
                Err(error) => warn!(%error, "built-in fallback discovery failed"),
            }
        }

        collection.complete_styles(config.synthetic)?;

        let mut resolver = CodepointResolver::new(collection);
        resolver.set_discovery(discovery);
        resolver.set_codepoint_map(config.codepoint_map.clone());
        for style in Style::ALL {
            if config.style_preference(style) == &StylePreference::Disabled {
                resolver.set_style_enabled(style, false);
            }
        }

        SharedGrid::new(resolver, GridOptions::default())
    }
}

fn user_descriptor(config: &GridConfig, style: Style, family: &CompactString) -> Descriptor {
    let style_name = match config.style_preference(style) {
        StylePreference::Named(name) => Some(name.clone()),
        StylePreference::Default | StylePreference::Disabled => None,
    };
    Descriptor {
        family: Some(family.clone()),
        // a named style overrides the bold/italic attributes
        bold: style_name.is_none().then_some(style.bold()),
        italic: style_name.is_none().then_some(style.italic()),
        style_name,
        size: Some(config.size),
        variations: config.variations.clone(),
        ..Default::default()
    }
}

fn builtin_fallbacks(size: f32) -> Vec<Descriptor> {
    let platform_emoji: &str = if cfg!(target_os = "macos") {
        "Apple Color Emoji"
    } else if cfg!(windows) {
        "Segoe UI Emoji"
    } else {
        "Noto Color Emoji"
    };

    let mut descriptors = vec![
        Descriptor {
            monospace: Some(true),
            size: Some(size),
            ..Default::default()
        },
        Descriptor {
            family: Some(platform_emoji.into()),
            size: Some(size),
            ..Default::default()
        },
    ];
    if platform_emoji != "Noto Color Emoji" {
        descriptors.push(Descriptor {
            family: Some("Noto Color Emoji".into()),
            size: Some(size),
            ..Default::default()
        });
    }
    descriptors.push(Descriptor {
        family: Some("Noto Emoji".into()),
        size: Some(size),
        ..Default::default()
    });
    descriptors
}
