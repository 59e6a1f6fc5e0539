//! 涵盖了本 crate 一系列常用的类型.

pub use crate::data::{Header, HeaderValue, ImageData, Mask, MrData, MrDataAttr, QmriData, Tensor};

#[cfg(feature = "io")]
pub use crate::{MrDataError, Result};
