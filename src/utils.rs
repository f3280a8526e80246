use crate::error::VecError;
use frunk::Generic;
use itertools::Itertools;
use std::error::Error;

/// Does the same thing as [frunk::from_generic]
pub trait IntoGeneric {
    fn into_generic<Dst>(self) -> Dst
    where
        Dst: Generic<Repr = Self>;
}
impl<Repr> IntoGeneric for Repr {
    fn into_generic<Dst>(self) -> Dst
    where
        Dst: Generic<Repr = Self>,
    {
        <Dst as Generic>::from(self)
    }
}

/// Shortcut for partition_result
pub trait CollectResult<T, E: Error> {
    fn collect_result(self) -> Result<Vec<T>, VecError<E>>;
}
impl<I, T, E: Error> CollectResult<T, E> for I
where
    I: Itertools<Item = Result<T, E>>,
{
    fn collect_result(self) -> Result<Vec<T>, VecError<E>> {
        let (v, e): (Vec<T>, Vec<E>) = self.partition_result();
        if e.is_empty() {
            Ok(v)
        } else {
            Err(VecError(e))
        }
    }
}
