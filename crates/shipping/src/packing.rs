//! 3D bin packing against a fixed box catalog.
//!
//! Self-contained: no ambient state, no side effects. The packer is a pure
//! function of its inputs and the injected catalog.
//!
//! # Heuristic
//!
//! First-fit-decreasing by volume. Boxes are preferred by lowest cost
//! weight, then smallest volume, then catalog order; instances are placed in
//! decreasing-volume order, ties broken by SKU then dimensions. If every
//! remaining instance fits the cheapest viable box, a single parcel is
//! emitted; otherwise the box that swallows the most remaining instances is
//! opened and the leftovers go around again. Exact optimality is not
//! guaranteed (bin packing is NP-hard), but the result is deterministic.
//!
//! Within a box, instances are placed at real coordinates by an axis-aligned
//! row/layer scheme: a row fills along the box width, rows advance along the
//! length by the deepest item in the row, and layers advance along the
//! height by the tallest item in the layer. Each instance tries its six
//! orientations lowest-height first. Placements never overlap, so a parcel
//! is geometrically feasible, not merely within the volume budget.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tidepool_core::Sku;

use crate::item::PackableItem;

/// One box in the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub id: String,
    pub name: String,
    /// Outer dimensions, same distance unit as the items.
    pub width: f64,
    pub length: f64,
    pub height: f64,
    /// Optimizer preference weight; lower is preferred.
    pub cost_weight: f64,
}

impl BoxSpec {
    /// Create a box spec.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: f64,
        length: f64,
        height: f64,
        cost_weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            length,
            height,
            cost_weight,
        }
    }

    /// Inner volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.width * self.length * self.height
    }

    /// Whether a single instance with the given dimensions fits this box in
    /// some axis permutation. Sorting both triples reduces the 6-orientation
    /// check to one elementwise comparison.
    #[must_use]
    pub fn fits(&self, width: f64, length: f64, height: f64) -> bool {
        let mut item = [width, length, height];
        let mut boxed = [self.width, self.length, self.height];
        item.sort_by(f64::total_cmp);
        boxed.sort_by(f64::total_cmp);
        item.iter().zip(boxed.iter()).all(|(i, b)| i <= b)
    }
}

/// The ordered, read-only box catalog provided by configuration.
#[derive(Debug, Clone, Default)]
pub struct BoxCatalog {
    boxes: Vec<BoxSpec>,
}

impl BoxCatalog {
    /// Create a catalog from an ordered list of boxes.
    #[must_use]
    pub const fn new(boxes: Vec<BoxSpec>) -> Self {
        Self { boxes }
    }

    /// Whether the catalog contains no boxes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes in optimizer preference order: lowest cost weight, then
    /// smallest volume, then catalog order.
    fn preference_order(&self) -> Vec<&BoxSpec> {
        let mut ordered: Vec<&BoxSpec> = self.boxes.iter().collect();
        ordered.sort_by(|a, b| {
            a.cost_weight
                .total_cmp(&b.cost_weight)
                .then(a.volume().total_cmp(&b.volume()))
        });
        ordered
    }
}

/// A `{id, quantity}` group within a packed parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelItem {
    pub id: Sku,
    pub quantity: u32,
}

/// One output box instance with its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedParcel {
    pub box_id: String,
    pub box_name: String,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    /// Sum of contained unit weights, rounded to 2 decimals.
    pub weight: f64,
    /// Contents grouped by item id, in placement order.
    pub items: Vec<ParcelItem>,
}

/// Errors from the packing optimizer.
#[derive(Debug, Error)]
pub enum PackingError {
    /// A single instance fits no box in the catalog in any orientation.
    /// Partial packing is never attempted: one unfit item fails the run.
    #[error("Item {sku} does not fit any box in the catalog")]
    ItemTooLarge { sku: Sku },
}

/// One physical object to place. Quantity has already been exploded away.
#[derive(Debug, Clone)]
struct Instance {
    id: Sku,
    width: f64,
    length: f64,
    height: f64,
    weight: f64,
    volume: f64,
}

/// 3D bin packing optimizer over a fixed catalog.
#[derive(Debug, Clone)]
pub struct Packer {
    catalog: BoxCatalog,
}

impl Packer {
    /// Create a packer over the given catalog.
    #[must_use]
    pub const fn new(catalog: BoxCatalog) -> Self {
        Self { catalog }
    }

    /// Pack every instance of every item into a set of parcels.
    ///
    /// Returns an empty list for an empty item list. The sum of quantities
    /// across all returned parcels always equals the sum of input
    /// quantities.
    ///
    /// # Errors
    ///
    /// Returns `PackingError::ItemTooLarge` if any single instance fits no
    /// catalog box.
    pub fn pack(&self, items: &[PackableItem]) -> Result<Vec<PackedParcel>, PackingError> {
        let mut remaining = explode_instances(items);
        if remaining.is_empty() {
            return Ok(Vec::new());
        }

        let preference = self.catalog.preference_order();

        // Every instance must fit at least one box on its own, otherwise the
        // whole run fails. Checked up front so the error names the first
        // offender in deterministic order.
        for instance in &remaining {
            let fits_any = preference
                .iter()
                .any(|b| b.fits(instance.width, instance.length, instance.height));
            if !fits_any {
                return Err(PackingError::ItemTooLarge {
                    sku: instance.id.clone(),
                });
            }
        }

        let mut parcels = Vec::new();
        while !remaining.is_empty() {
            let Some((spec, taken)) = select_box(&preference, &remaining) else {
                // Unreachable after the fits-any check above, but never loop
                // forever on a box that takes nothing.
                match remaining.first() {
                    Some(instance) => {
                        return Err(PackingError::ItemTooLarge {
                            sku: instance.id.clone(),
                        });
                    }
                    None => break,
                }
            };
            let (contents, leftovers) = split_taken(remaining, &taken);
            parcels.push(build_parcel(spec, &contents));
            remaining = leftovers;
        }

        Ok(parcels)
    }
}

/// Explode item quantities into individual instances and sort them for
/// first-fit-decreasing: volume descending, then SKU, then dimensions.
fn explode_instances(items: &[PackableItem]) -> Vec<Instance> {
    let mut instances = Vec::new();
    for item in items {
        let volume = item.unit_volume();
        for _ in 0..item.quantity {
            instances.push(Instance {
                id: item.id.clone(),
                width: item.width,
                length: item.length,
                height: item.height,
                weight: item.weight,
                volume,
            });
        }
    }
    instances.sort_by(|a, b| {
        b.volume
            .total_cmp(&a.volume)
            .then_with(|| a.id.cmp(&b.id))
            .then(a.width.total_cmp(&b.width))
            .then(a.length.total_cmp(&b.length))
            .then(a.height.total_cmp(&b.height))
    });
    instances
}

/// Choose the box for the next parcel and the indices of the instances it
/// takes.
///
/// Prefers the first box in preference order that holds everything that is
/// left; failing that, the box that swallows the most instances under a
/// greedy fill, ties going to the cheaper box. Returns `None` only if no box
/// takes a single instance.
fn select_box<'a>(
    preference: &[&'a BoxSpec],
    remaining: &[Instance],
) -> Option<(&'a BoxSpec, Vec<usize>)> {
    for spec in preference {
        let taken = greedy_fill(spec, remaining);
        if taken.len() == remaining.len() {
            return Some((spec, taken));
        }
    }

    let mut best: Option<(&'a BoxSpec, Vec<usize>)> = None;
    for spec in preference {
        let taken = greedy_fill(spec, remaining);
        if taken.is_empty() {
            continue;
        }
        let beats = best.as_ref().is_none_or(|(_, b)| taken.len() > b.len());
        if beats {
            best = Some((spec, taken));
        }
    }
    best
}

/// Running placement cursor inside one box: `x` along the width, `y` along
/// the length, `z` along the height.
#[derive(Debug, Clone, Copy, Default)]
struct PlacementCursor {
    x: f64,
    y: f64,
    z: f64,
    row_depth: f64,
    layer_height: f64,
}

/// The six axis-aligned orientations of a dimension triple as `[w, d, h]`,
/// lowest height first (then depth, then width) so layers stay short.
fn orientations(width: f64, length: f64, height: f64) -> [[f64; 3]; 6] {
    let mut perms = [
        [width, length, height],
        [width, height, length],
        [length, width, height],
        [length, height, width],
        [height, width, length],
        [height, length, width],
    ];
    perms.sort_by(|a, b| {
        a[2].total_cmp(&b[2])
            .then(a[1].total_cmp(&b[1]))
            .then(a[0].total_cmp(&b[0]))
    });
    perms
}

/// Advance the cursor by one placement, or return `None` if the oriented
/// instance cannot be placed anywhere after the cursor.
///
/// A full row wraps to the next row, a full layer wraps to the next layer;
/// an instance taller than the remaining height does not fit. Row and layer
/// extents are the maxima of their contents, so placements never overlap.
fn try_place(spec: &BoxSpec, cursor: PlacementCursor, dims: [f64; 3]) -> Option<PlacementCursor> {
    let [w, d, h] = dims;
    if w > spec.width || d > spec.length || h > spec.height {
        return None;
    }
    let mut next = cursor;
    if next.x + w > spec.width {
        next.x = 0.0;
        next.y += next.row_depth;
        next.row_depth = 0.0;
    }
    if next.y + d > spec.length {
        next.x = 0.0;
        next.y = 0.0;
        next.z += next.layer_height;
        next.row_depth = 0.0;
        next.layer_height = 0.0;
    }
    if next.z + h > spec.height {
        return None;
    }
    next.x += w;
    next.row_depth = next.row_depth.max(d);
    next.layer_height = next.layer_height.max(h);
    Some(next)
}

/// Greedily place remaining instances into a box in first-fit-decreasing
/// order, returning the indices taken.
fn greedy_fill(spec: &BoxSpec, remaining: &[Instance]) -> Vec<usize> {
    let mut cursor = PlacementCursor::default();
    let mut taken = Vec::new();
    for (index, instance) in remaining.iter().enumerate() {
        let placed = orientations(instance.width, instance.length, instance.height)
            .into_iter()
            .find_map(|dims| try_place(spec, cursor, dims));
        if let Some(next) = placed {
            cursor = next;
            taken.push(index);
        }
    }
    taken
}

/// Partition instances into (taken, leftovers) by index.
fn split_taken(instances: Vec<Instance>, taken: &[usize]) -> (Vec<Instance>, Vec<Instance>) {
    let mut contents = Vec::with_capacity(taken.len());
    let mut leftovers = Vec::new();
    for (index, instance) in instances.into_iter().enumerate() {
        if taken.contains(&index) {
            contents.push(instance);
        } else {
            leftovers.push(instance);
        }
    }
    (contents, leftovers)
}

/// Assemble the output parcel: box dimensions copied through, contents
/// grouped by SKU in placement order, weight rounded to 2 decimals.
fn build_parcel(spec: &BoxSpec, contents: &[Instance]) -> PackedParcel {
    let mut items: Vec<ParcelItem> = Vec::new();
    let mut weight = 0.0_f64;
    for instance in contents {
        weight += instance.weight;
        match items.iter_mut().find(|g| g.id == instance.id) {
            Some(group) => group.quantity += 1,
            None => items.push(ParcelItem {
                id: instance.id.clone(),
                quantity: 1,
            }),
        }
    }

    PackedParcel {
        box_id: spec.id.clone(),
        box_name: spec.name.clone(),
        width: spec.width,
        length: spec.length,
        height: spec.height,
        weight: round_weight(weight),
        items,
    }
}

/// Standard rounding to 2 decimal places (not banker's rounding; distinct
/// from the monetary rounding used elsewhere in the system).
fn round_weight(weight: f64) -> f64 {
    (weight * 100.0).round() / 100.0
}
