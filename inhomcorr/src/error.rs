//! 运行时错误.

use thiserror::Error;

/// 本 crate 读取操作的结果类型.
pub type Result<T> = std::result::Result<T, MrDataError>;

/// 读取 MR 数据时可能发生的错误.
///
/// 所有错误均原样向上传递, 不做重试.
#[derive(Error, Debug)]
pub enum MrDataError {
    /// 读取或转换 nifti 文件错误.
    #[error("nifti error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    /// 读取 npz 文件错误.
    #[error("npz error: {0}")]
    ReadNpz(#[from] ndarray_npy::ReadNpzError),

    /// 其他底层 I/O 错误.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
