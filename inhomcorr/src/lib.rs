#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 提供 MR 及定量 MR (QMRI) 成像数据的基础记录类型.
//!
//! 该 crate 只负责 "持有" 数据, 不对数据做任何计算 (拟合, 重建, 配准等),
//! 也不定义任何自有的持久化格式.
//!
//! # 结构
//!
//! 1. [`MrData`]: 所有记录共有的部分, 即 header 映射和可选的 mask.
//! 2. [`ImageData`]: 在 [`MrData`] 的基础上持有单个图像张量.
//! 3. [`QmriData`]: 在 [`MrData`] 的基础上持有 T1 和 rho 两张参数图.
//!
//! 后两者通过组合持有 [`MrData`], 并通过 [`MrDataAttr`] trait 暴露其访问器.
//!
//! # 张量
//!
//! 所有张量均为 [`Tensor`], 即 `ndarray::ArcArray<A, IxDyn>`. 克隆张量只增加引用计数,
//! 不复制底层数据; getter 返回的就是 setter 存入的那一个张量.
//!
//! # Features
//!
//! - `io`: 从 nifti (`.nii`, `.nii.gz`) 和 npz 文件读取记录. 默认开启.
//! - `serde`: 为 header 和各记录类型提供序列化/反序列化支持. 默认开启.
//!
//! # 单位
//!
//! 所有物理量均以 SI 单位表示. T1 以秒为单位, rho 为任意单位.

/// MR 数据记录类型.
mod data;

pub use data::{Header, HeaderValue, ImageData, Mask, MrData, MrDataAttr, QmriData, Tensor};

pub mod consts;

cfg_if::cfg_if! {
    if #[cfg(feature = "io")] {
        mod error;

        pub use error::{MrDataError, Result};
    }
}

pub mod prelude;
