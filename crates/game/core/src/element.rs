//! Elemental alignments, the resistance matrix and damage resolution.
//!
//! Characters resist each element separately and attacks carry a damage value
//! per element. Resistances usually reduce incoming damage, but along a fixed
//! vulnerability chain a higher resistance *increases* the damage taken: dark
//! is vulnerable to light, so more dark resistance means more light damage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// One of the six fixed damage/resistance categories.
///
/// Declaration order is the canonical element order; every per-element loop
/// (damage sums, attack shaping) walks the elements in this order so floating
/// point results are reproducible.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Element {
    Normal = 0,
    Light = 1,
    Order = 2,
    Dark = 3,
    Chaos = 4,
    Life = 5,
}

impl Element {
    /// Number of elements.
    pub const COUNT: usize = 6;

    /// Every element in canonical order.
    pub const ALL: [Element; Element::COUNT] = [
        Element::Normal,
        Element::Light,
        Element::Order,
        Element::Dark,
        Element::Chaos,
        Element::Life,
    ];

    /// Row/column of this element in [`RESIST_TABLE`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Successor on the light → order → dark → chaos → life → light cycle.
    ///
    /// `Normal` sits outside the cycle.
    pub const fn cycle_next(self) -> Option<Element> {
        match self {
            Element::Normal => None,
            Element::Light => Some(Element::Order),
            Element::Order => Some(Element::Dark),
            Element::Dark => Some(Element::Chaos),
            Element::Chaos => Some(Element::Life),
            Element::Life => Some(Element::Light),
        }
    }
}

/// Returns true if the two elements are allied.
///
/// `Normal` is allied with every non-normal element. The other five form a
/// cycle and each is allied with its two neighbours. A pair of identical
/// elements is not an alliance.
pub fn are_allied(first: Element, second: Element) -> bool {
    match (first, second) {
        (Element::Normal, Element::Normal) => false,
        (Element::Normal, _) | (_, Element::Normal) => true,
        _ => first.cycle_next() == Some(second) || second.cycle_next() == Some(first),
    }
}

/// Logical negation of [`are_allied`]; every pair is either allied or opposed.
pub fn are_opposed(first: Element, second: Element) -> bool {
    !are_allied(first, second)
}

/// `RESIST_TABLE[resist][attack]`: how much one point of `resist` counts
/// against damage of element `attack`.
///
/// ```text
///            nm   lt   or   dk   ch   lf   <- attack
/// normal    1.0  0.5  0.5  0.5  0.5  0.5
/// light     1.0  1.0  1.0  2.0 -1.0  1.0
/// order     1.0  1.0  1.0  1.0  2.0 -1.0
/// dark      1.0 -1.0  1.0  1.0  1.0  2.0
/// chaos     1.0  2.0 -1.0  1.0  1.0  1.0
/// life      1.0  1.0  2.0 -1.0  1.0  1.0
/// ```
pub const RESIST_TABLE: [[f64; Element::COUNT]; Element::COUNT] = [
    [1.0, 0.5, 0.5, 0.5, 0.5, 0.5],
    [1.0, 1.0, 1.0, 2.0, -1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0, 2.0, -1.0],
    [1.0, -1.0, 1.0, 1.0, 1.0, 2.0],
    [1.0, 2.0, -1.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 2.0, -1.0, 1.0, 1.0],
];

/// Multiplier applied to a `resist` point against an `attack` element.
#[inline]
pub const fn resist_multiplier(resist: Element, attack: Element) -> f64 {
    RESIST_TABLE[resist.index()][attack.index()]
}

/// Sparse element → value mapping used for resistances and attack profiles.
///
/// Absent elements are distinct from elements present with value `0.0`:
/// damage resolution only visits present entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementMap(BTreeMap<Element, f64>);

impl ElementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `element` if present.
    pub fn get(&self, element: Element) -> Option<f64> {
        self.0.get(&element).copied()
    }

    /// Value for `element`, treating an absent entry as zero.
    pub fn value(&self, element: Element) -> f64 {
        self.get(element).unwrap_or(0.0)
    }

    pub fn set(&mut self, element: Element, value: f64) {
        self.0.insert(element, value);
    }

    /// Builder form of [`ElementMap::set`].
    #[must_use]
    pub fn with(mut self, element: Element, value: f64) -> Self {
        self.set(element, value);
        self
    }

    /// Adds `delta` to `element`, inserting it when absent.
    pub fn add(&mut self, element: Element, delta: f64) {
        *self.0.entry(element).or_insert(0.0) += delta;
    }

    /// Adds every entry of `deltas` into this map.
    pub fn apply_deltas(&mut self, deltas: &ElementMap) {
        for (element, delta) in deltas.iter() {
            self.add(element, delta);
        }
    }

    /// Multiplies a present entry in place; absent entries stay absent.
    pub fn scale(&mut self, element: Element, factor: f64) {
        if let Some(value) = self.0.get_mut(&element) {
            *value *= factor;
        }
    }

    /// Sum of all present values in canonical element order.
    pub fn total(&self) -> f64 {
        self.0.values().fold(0.0, |sum, value| sum + value)
    }

    pub fn contains(&self, element: Element) -> bool {
        self.0.contains_key(&element)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries in canonical element order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.0.iter().map(|(element, value)| (*element, *value))
    }
}

impl FromIterator<(Element, f64)> for ElementMap {
    fn from_iter<I: IntoIterator<Item = (Element, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(Element, f64); N]> for ElementMap {
    fn from(entries: [(Element, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Resolves an attack profile against a resistance profile.
///
/// For every attack element `a` with value `aval`, the effective resistance is
/// `rval = Σ resists[r] · RESIST_TABLE[r][a]` over the present resist
/// elements. A negative `rval` adds its magnitude to the damage; otherwise the
/// damage is mitigated with diminishing returns as `aval² / (aval + rval)`.
/// Contributions are summed in canonical element order.
///
/// When `aval + rval == 0` the contribution is zero. A non-positive `aval`
/// contributes nothing, so the total is never negative.
pub fn compute_damage(resists: &ElementMap, attack: &ElementMap) -> f64 {
    attack.iter().fold(0.0, |total, (attack_type, aval)| {
        let rval = resists.iter().fold(0.0, |sum, (resist_type, resist)| {
            sum + resist * resist_multiplier(resist_type, attack_type)
        });
        total + mitigate(aval, rval)
    })
}

fn mitigate(aval: f64, rval: f64) -> f64 {
    if aval <= 0.0 {
        return 0.0;
    }
    if rval < 0.0 {
        return aval - rval;
    }
    let denominator = aval + rval;
    if denominator == 0.0 {
        0.0
    } else {
        aval * aval / denominator
    }
}
