// Canvas reuse helpers.
//
// Three flavours, all "recreate only when stale":
//   * `ensure_canvas`  – one private slot, stale when the size changes;
//   * `SurfaceCache`   – slots keyed by name, same rule per key;
//   * `HashedCanvas`   – one slot, stale when a content key changes.

use std::collections::{HashMap, hash_map::Entry};

use super::software::Canvas;

/// Canvas in `slot`, replaced by a fresh transparent one when missing or
/// when its size differs from `width × height`.
pub fn ensure_canvas<'a>(
    slot: &'a mut Option<Canvas>,
    label: &str,
    width: usize,
    height: usize,
) -> &'a mut Canvas {
    if slot
        .as_ref()
        .is_some_and(|c| c.width() != width || c.height() != height)
    {
        *slot = None;
    }
    slot.get_or_insert_with(|| {
        log::debug!("allocating {label} surface at {width}x{height}");
        Canvas::new(width, height)
    })
}

/// Canvases keyed by name, each sized by its last request.
///
/// * Same key, same size → the same canvas, contents untouched.
/// * Same key, new size → a fresh, transparent canvas.
#[derive(Default)]
pub struct SurfaceCache {
    by_name: HashMap<String, Canvas>,
}

impl SurfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas for `key`, (re)allocated when `width`/`height` changed.
    pub fn acquire(&mut self, key: &str, width: usize, height: usize) -> &mut Canvas {
        match self.by_name.entry(key.to_owned()) {
            Entry::Occupied(e) => {
                let canvas = e.into_mut();
                if canvas.width() != width || canvas.height() != height {
                    log::debug!("surface cache: resizing `{key}` to {width}x{height}");
                    *canvas = Canvas::new(width, height);
                }
                canvas
            }
            Entry::Vacant(e) => {
                log::debug!("surface cache: allocating `{key}` at {width}x{height}");
                e.insert(Canvas::new(width, height))
            }
        }
    }

    /// Canvas for `key` if one was ever acquired.
    pub fn get(&self, key: &str) -> Option<&Canvas> {
        self.by_name.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// A canvas tagged with the key of the parameters it was drawn from.
#[derive(Clone, Debug)]
pub struct HashedCanvas<K> {
    key: K,
    canvas: Canvas,
}

impl<K: PartialEq> HashedCanvas<K> {
    /// The cached canvas when its key equals `key`, otherwise a canvas freshly
    /// drawn by `build` (which then replaces the slot's content).
    pub fn recompute_if_stale<'a, F>(slot: &'a mut Option<Self>, key: K, build: F) -> &'a Canvas
    where
        F: FnOnce(&K) -> Canvas,
    {
        if slot.as_ref().is_some_and(|c| c.key != key) {
            *slot = None;
        }
        let entry = slot.get_or_insert_with(|| {
            let canvas = build(&key);
            HashedCanvas { key, canvas }
        });
        &entry.canvas
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{math::vec2, renderer::Surface};

    #[test]
    fn same_size_reuses_contents() {
        let mut cache = SurfaceCache::new();
        cache
            .acquire("lc", 4, 4)
            .fill_rect(vec2(0.0, 0.0), vec2(4.0, 4.0));
        assert_eq!(cache.acquire("lc", 4, 4).raster().alpha(1, 1), 1.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn new_size_reallocates() {
        let mut cache = SurfaceCache::new();
        cache
            .acquire("lc", 4, 4)
            .fill_rect(vec2(0.0, 0.0), vec2(4.0, 4.0));
        let c = cache.acquire("lc", 8, 2);
        assert_eq!((c.width(), c.height()), (8, 2));
        assert_eq!(c.raster().alpha(1, 1), 0.0);
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn ensure_canvas_tracks_size() {
        let mut slot = None;
        ensure_canvas(&mut slot, "test", 2, 2).fill_rect(vec2(0.0, 0.0), vec2(2.0, 2.0));
        assert_eq!(ensure_canvas(&mut slot, "test", 2, 2).raster().alpha(0, 0), 1.0);
        assert_eq!(ensure_canvas(&mut slot, "test", 3, 2).raster().alpha(0, 0), 0.0);
    }

    #[test]
    fn hashed_canvas_rebuilds_on_key_change() {
        let mut slot: Option<HashedCanvas<u32>> = None;
        let mut builds = 0;
        for key in [1, 1, 2, 2, 1] {
            HashedCanvas::recompute_if_stale(&mut slot, key, |&k| {
                builds += 1;
                Canvas::new(k as usize, 1)
            });
        }
        assert_eq!(builds, 3);
        assert_eq!(slot.as_ref().map(|c| *c.key()), Some(1));
    }
}
