//! Per-axis quantities for two-dimensional grids.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

/// Denotes the first (fast-varying) or second grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dim2 {
    X = 0,
    Y = 1,
}

impl Dim2 {
    /// Creates an array for iterating over the two axes.
    pub fn slice() -> [Self; 2] {
        [Self::X, Self::Y]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "axis 1",
                Self::Y => "axis 2",
            }
        )
    }
}

/// Represents any quantity with one component per grid axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct In2D<T>([T; 2]);

impl<T> In2D<T> {
    /// Creates a new 2D quantity given the two components.
    pub fn new(x: T, y: T) -> Self {
        Self([x, y])
    }

    /// Creates a new 2D quantity by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim2) -> T,
    {
        Self::new(create_component(Dim2::X), create_component(Dim2::Y))
    }

    /// Creates a new 2D quantity with the given value copied into both components.
    pub fn same(a: T) -> Self
    where
        T: Copy,
    {
        Self([a, a])
    }

    /// Creates a new 2D quantity by mapping each component.
    pub fn map<U, M>(&self, map_component: M) -> In2D<U>
    where
        M: Fn(&T) -> U,
    {
        In2D::new(map_component(&self.0[0]), map_component(&self.0[1]))
    }

    /// Creates a 2D quantity of references to the components.
    pub fn as_refs(&self) -> In2D<&T> {
        In2D::new(&self.0[0], &self.0[1])
    }

    /// Creates a new tuple containing copies of the two components.
    pub fn to_tuple(&self) -> (T, T)
    where
        T: Copy,
    {
        (self[Dim2::X], self[Dim2::Y])
    }

    /// Computes the product of the two components.
    pub fn product(&self) -> T
    where
        T: Copy + std::ops::Mul<Output = T>,
    {
        self[Dim2::X] * self[Dim2::Y]
    }
}

impl<T> Index<Dim2> for In2D<T> {
    type Output = T;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim2> for In2D<T> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<'a, T> IntoIterator for &'a In2D<T> {
    type Item = &'a T;
    type IntoIter = ::std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Copy> From<(T, T)> for In2D<T> {
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

impl<T: fmt::Display> fmt::Display for In2D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0[0], self.0[1])
    }
}
