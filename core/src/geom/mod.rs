use std::{fmt, ops::Index, str::FromStr};

use derive_more::Constructor;
use thiserror::Error;

/// Spatial axis of a field volume.
///
/// The discriminant is the array axis under the `zyx` storage order used by
/// EMSES, so `Dim3D::Z as usize == 0`.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Dim3D {
    Z = 0,
    Y = 1,
    X = 2,
}

impl Dim3D {
    /// All axes in storage order.
    pub fn iter() -> impl DoubleEndedIterator<Item = Dim3D> {
        [Dim3D::Z, Dim3D::Y, Dim3D::X].into_iter()
    }

    pub fn array_axis(self) -> ndarray::Axis {
        ndarray::Axis(self as usize)
    }

    pub fn as_char(self) -> char {
        match self {
            Dim3D::X => 'x',
            Dim3D::Y => 'y',
            Dim3D::Z => 'z',
        }
    }

    pub fn from_char(c: char) -> Option<Dim3D> {
        match c.to_ascii_lowercase() {
            'x' => Some(Dim3D::X),
            'y' => Some(Dim3D::Y),
            'z' => Some(Dim3D::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Dim3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid axis selection '{0}'")]
pub struct ParseAxisError(pub String);

impl FromStr for Dim3D {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(Dim3D::from_char), chars.next()) {
            (Some(dim), None) => Ok(dim),
            _ => Err(ParseAxisError(s.to_string())),
        }
    }
}

/// Plane spanned by two axes. The first axis is drawn horizontally, the
/// second vertically.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    pub fn iter() -> impl Iterator<Item = Plane> {
        [Plane::XY, Plane::XZ, Plane::YZ].into_iter()
    }

    pub fn horizontal(self) -> Dim3D {
        match self {
            Plane::XY | Plane::XZ => Dim3D::X,
            Plane::YZ => Dim3D::Y,
        }
    }

    pub fn vertical(self) -> Dim3D {
        match self {
            Plane::XY => Dim3D::Y,
            Plane::XZ | Plane::YZ => Dim3D::Z,
        }
    }

    pub fn dims(self) -> [Dim3D; 2] {
        [self.horizontal(), self.vertical()]
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.horizontal(), self.vertical())
    }
}

impl FromStr for Plane {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xy" => Ok(Plane::XY),
            "xz" => Ok(Plane::XZ),
            "yz" => Ok(Plane::YZ),
            _ => Err(ParseAxisError(s.to_string())),
        }
    }
}

/// Per-axis triple, indexable by [`Dim3D`].
#[derive(Constructor, Default, PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

pub type Vec3U = Vec3<usize>;

impl<T: Copy> Vec3<T> {
    pub fn to_zyx(&self) -> [T; 3] {
        [self.z, self.y, self.x]
    }

    pub fn enumerate<'a>(&self) -> impl Iterator<Item = (Dim3D, T)> + 'a
    where
        T: 'a,
    {
        Dim3D::iter().zip(self.to_zyx())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Dim3D, T) -> U) -> Vec3<U> {
        Vec3::new(f(Dim3D::X, self.x), f(Dim3D::Y, self.y), f(Dim3D::Z, self.z))
    }
}

impl Vec3U {
    pub fn center(&self) -> Self {
        self.map(|_, n| n / 2)
    }
}

impl<T> Index<Dim3D> for Vec3<T> {
    type Output = T;

    fn index(&self, i: Dim3D) -> &T {
        match i {
            Dim3D::X => &self.x,
            Dim3D::Y => &self.y,
            Dim3D::Z => &self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_order() {
        assert_eq!(Dim3D::Z.array_axis(), ndarray::Axis(0));
        assert_eq!(Dim3D::X.array_axis(), ndarray::Axis(2));
        assert_eq!(
            Dim3D::iter().map(Dim3D::as_char).collect::<String>(),
            "zyx"
        );
    }

    #[test]
    fn plane_axes() {
        for plane in Plane::iter() {
            let label = plane.to_string();
            assert_eq!(label.parse::<Plane>().unwrap(), plane);
            let [h, v] = plane.dims();
            assert_ne!(h, v);
        }
        assert_eq!(Plane::XZ.horizontal(), Dim3D::X);
        assert_eq!(Plane::XZ.vertical(), Dim3D::Z);
        assert!("zx".parse::<Plane>().is_err());
    }

    #[test]
    fn parse_dim() {
        assert_eq!("x".parse::<Dim3D>().unwrap(), Dim3D::X);
        assert_eq!("Z".parse::<Dim3D>().unwrap(), Dim3D::Z);
        assert!("xy".parse::<Dim3D>().is_err());
        assert!("".parse::<Dim3D>().is_err());
    }

    #[test]
    fn shape_and_center() {
        let shape: Vec3U = Vec3::new(11, 8, 5);
        assert_eq!(shape[Dim3D::Z], 5);
        assert_eq!(shape.center(), Vec3::new(5, 4, 2));
        assert_eq!(shape.to_zyx(), [5, 8, 11]);
    }
}
