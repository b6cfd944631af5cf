//! Overflow-checked integer conversions and precondition guards.
//!
//! Every boundary crossing from raw input (a plain integer list, a config
//! value) into the crate's typed representation goes through here. A failing
//! check aborts the current evaluation; nothing is truncated or wrapped.

use crate::error::{AmlzError, Result};
use std::any::type_name;
use std::collections::{HashMap, VecDeque};
use std::fmt::Display;

/// Casts between integer types, failing if the value does not fit.
pub fn safe_cast<In, Out>(value: In) -> Result<Out>
where
    In: Copy + Display,
    Out: TryFrom<In>,
{
    Out::try_from(value).map_err(|_| AmlzError::Overflow {
        value: value.to_string(),
        target: type_name::<Out>(),
    })
}

pub fn ensure_positive<T>(value: T, what: &str) -> Result<T>
where
    T: PartialOrd + Default + Display + Copy,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(AmlzError::NonPositive(format!("{} = {}", what, value)))
    }
}

/// The non-null check. Rust references cannot be null, optional ones are `Option`.
pub fn ensure_present<T>(value: Option<T>, what: &'static str) -> Result<T> {
    value.ok_or(AmlzError::Missing(what))
}

/// Anything with a length. Also works for strings.
pub trait Length {
    fn length(&self) -> usize;
}

impl<T> Length for [T] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> Length for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> Length for VecDeque<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> Length for HashMap<K, V, S> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl Length for str {
    fn length(&self) -> usize {
        self.len()
    }
}

impl Length for String {
    fn length(&self) -> usize {
        self.len()
    }
}

pub fn ensure_non_empty<'a, C>(value: &'a C, what: &'static str) -> Result<&'a C>
where
    C: Length + ?Sized,
{
    if value.length() == 0 {
        Err(AmlzError::Empty(what))
    } else {
        Ok(value)
    }
}

/// Requires `value.length() < max_size`.
pub fn ensure_size_below<'a, C>(value: &'a C, max_size: usize, what: &'static str) -> Result<&'a C>
where
    C: Length + ?Sized,
{
    let size = value.length();
    if size < max_size {
        Ok(value)
    } else {
        Err(AmlzError::SizeLimit {
            what,
            size,
            limit: max_size,
        })
    }
}
