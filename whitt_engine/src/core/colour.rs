use crate::core::types::Number;
use std::array;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul};

/// Numeric type of a single colour channel
pub type Channel = Number;

/// An `N`-channel colour; the engine renders RGBA ([`Colour<4>`]).
///
/// Channels are linear intensities; values are unbounded during accumulation
/// and only clamped on export.
#[derive(Copy, Clone, Debug, PartialOrd, PartialEq)]
#[repr(transparent)]
pub struct Colour<const N: usize>(pub [Channel; N]);

// can't derive, `[Channel; N]: Default` only holds for N <= 32
impl<const N: usize> Default for Colour<N> {
    fn default() -> Self { Self::new([0.; N]) }
}

impl<const N: usize> Colour<N> {
    /// How many channels there are, for this colour.
    /// RGBA is 4 channels.
    pub const CHANNEL_COUNT: usize = N;

    pub const BLACK: Self = Self::new([0.; N]);
    pub const WHITE: Self = Self::new([1.; N]);

    pub const fn new(val: [Channel; N]) -> Self { Self(val) }

    pub fn map(&self, op: impl FnMut(Channel) -> Channel) -> Self { Self(self.0.map(op)) }

    /// Clamps all channels into `0.0..=1.0`, for image export
    pub fn clamped(&self) -> Self { self.map(|c| c.clamp(0., 1.)) }
}

impl Colour<4> {
    pub const fn rgba(r: Channel, g: Channel, b: Channel, a: Channel) -> Self {
        Self::new([r, g, b, a])
    }

    /// An opaque colour from RGB channels, alpha set to one
    pub const fn rgb(r: Channel, g: Channel, b: Channel) -> Self { Self::new([r, g, b, 1.]) }

    pub const fn r(&self) -> Channel { self.0[0] }
    pub const fn g(&self) -> Channel { self.0[1] }
    pub const fn b(&self) -> Channel { self.0[2] }
    pub const fn a(&self) -> Channel { self.0[3] }
}

// region Operators

impl<const N: usize> Add for Colour<N> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Self(array::from_fn(|i| self.0[i] + rhs.0[i])) }
}

impl<const N: usize> AddAssign for Colour<N> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<const N: usize> Mul<Channel> for Colour<N> {
    type Output = Self;
    fn mul(self, rhs: Channel) -> Self { self.map(|c| c * rhs) }
}

/// Component-wise colour modulation
impl<const N: usize> Mul for Colour<N> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self { Self(array::from_fn(|i| self.0[i] * rhs.0[i])) }
}

impl<const N: usize> Index<usize> for Colour<N> {
    type Output = Channel;
    fn index(&self, index: usize) -> &Channel { &self.0[index] }
}

impl<const N: usize> IndexMut<usize> for Colour<N> {
    fn index_mut(&mut self, index: usize) -> &mut Channel { &mut self.0[index] }
}

impl<const N: usize> From<[Channel; N]> for Colour<N> {
    fn from(val: [Channel; N]) -> Self { Self::new(val) }
}

impl<const N: usize> From<Colour<N>> for [Channel; N] {
    fn from(val: Colour<N>) -> Self { val.0 }
}

// endregion Operators
