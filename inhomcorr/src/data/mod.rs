use ndarray::{ArcArray, IxDyn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod header;
mod image;
mod qmri;

pub use header::{Header, HeaderValue};
pub use image::ImageData;
pub use qmri::QmriData;

/// 任意维度的共享张量.
///
/// 克隆只增加引用计数; 对共享张量的就地修改会先触发写时复制.
pub type Tensor<A> = ArcArray<A, IxDyn>;

/// 体素 mask. `true` 代表有效体素.
pub type Mask = Tensor<bool>;

/// MR 数据记录的共有部分: header 和可选的 mask.
///
/// 创建时 header 为空, mask 不存在. 所有字段都在创建后通过 setter 设置,
/// setter 不做任何校验.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MrData {
    header: Header,
    mask: Option<Mask>,
}

impl MrData {
    /// 创建空记录.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MrDataAttr for MrData {
    #[inline]
    fn mr_data(&self) -> &MrData {
        self
    }

    #[inline]
    fn mr_data_mut(&mut self) -> &mut MrData {
        self
    }
}

/// MR 数据记录 header 和 mask 的共用访问器.
///
/// 实现者只需给出底层 [`MrData`] 的引用.
pub trait MrDataAttr {
    /// 获取底层共有部分.
    fn mr_data(&self) -> &MrData;

    /// 获取底层共有部分的可变引用.
    fn mr_data_mut(&mut self) -> &mut MrData;

    /// 获取 header.
    #[inline]
    fn header(&self) -> &Header {
        &self.mr_data().header
    }

    /// 获取 header 的可变引用, 可就地增删元信息.
    #[inline]
    fn header_mut(&mut self) -> &mut Header {
        &mut self.mr_data_mut().header
    }

    /// 替换整个 header.
    #[inline]
    fn set_header(&mut self, header: Header) {
        self.mr_data_mut().header = header;
    }

    /// 获取 mask. 未设置时返回 `None`.
    #[inline]
    fn mask(&self) -> Option<&Mask> {
        self.mr_data().mask.as_ref()
    }

    /// 设置 mask. 不检查其形状.
    #[inline]
    fn set_mask(&mut self, mask: Mask) {
        self.mr_data_mut().mask = Some(mask);
    }

    /// 取走 mask, 之后 `self.mask()` 返回 `None`.
    #[inline]
    fn take_mask(&mut self) -> Option<Mask> {
        self.mr_data_mut().mask.take()
    }

    /// mask 能否广播到形状 `shape`. 没有 mask 时返回 `true`.
    fn mask_broadcasts_to(&self, shape: &[usize]) -> bool {
        self.mask().map_or(true, |m| m.broadcast(shape).is_some())
    }
}
