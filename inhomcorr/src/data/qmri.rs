use super::{MrData, MrDataAttr, Tensor};
use ndarray::{ArcArray, IxDyn};
use num::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 定量 MR 数据记录, 包括 header, 可选的 mask, 以及 T1 和 rho 两张参数图.
///
/// 所有数据均以 SI 单位给出: T1 以秒为单位, rho 为任意单位.
///
/// # 序列化
///
/// 默认 T1 图的值为正无穷. JSON 无法表示非有限浮点数 (会被写成 `null`,
/// 且无法读回), 因此含默认 T1 的记录应使用 bincode 等二进制格式序列化.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QmriData<A = f32> {
    base: MrData,
    t1: Tensor<A>,
    rho: Tensor<A>,
}

impl<A> MrDataAttr for QmriData<A> {
    #[inline]
    fn mr_data(&self) -> &MrData {
        &self.base
    }

    #[inline]
    fn mr_data_mut(&mut self) -> &mut MrData {
        &mut self.base
    }
}

/// 0 维张量.
#[inline]
fn scalar<A: Clone>(value: A) -> Tensor<A> {
    ArcArray::from_elem(IxDyn(&[]), value)
}

impl<A: Float> QmriData<A> {
    /// 创建记录.
    ///
    /// 参数为 `None` 时使用默认值: T1 为 [`Self::default_t1`], rho 为 [`Self::default_rho`].
    /// 给出的张量总是被原样保存, 即使其全为零或为空.
    pub fn new(t1: Option<Tensor<A>>, rho: Option<Tensor<A>>) -> Self {
        Self {
            base: MrData::new(),
            t1: t1.unwrap_or_else(Self::default_t1),
            rho: rho.unwrap_or_else(Self::default_rho),
        }
    }

    /// 默认 T1 图: 值为正无穷 (秒) 的 0 维张量.
    #[inline]
    pub fn default_t1() -> Tensor<A> {
        scalar(A::infinity())
    }

    /// 默认 rho 图: 值为 1 (任意单位) 的 0 维张量.
    #[inline]
    pub fn default_rho() -> Tensor<A> {
        scalar(A::one())
    }
}

impl<A: Float> Default for QmriData<A> {
    #[inline]
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl<A> QmriData<A> {
    /// 获取 T1 图 \[s\].
    #[inline]
    pub fn t1(&self) -> &Tensor<A> {
        &self.t1
    }

    /// 获取 T1 图的可变引用.
    #[inline]
    pub fn t1_mut(&mut self) -> &mut Tensor<A> {
        &mut self.t1
    }

    /// 替换 T1 图 \[s\].
    #[inline]
    pub fn set_t1(&mut self, t1: Tensor<A>) {
        self.t1 = t1;
    }

    /// 获取 rho 图 \[a.u.\].
    #[inline]
    pub fn rho(&self) -> &Tensor<A> {
        &self.rho
    }

    /// 获取 rho 图的可变引用.
    #[inline]
    pub fn rho_mut(&mut self) -> &mut Tensor<A> {
        &mut self.rho
    }

    /// 替换 rho 图 \[a.u.\].
    #[inline]
    pub fn set_rho(&mut self, rho: Tensor<A>) {
        self.rho = rho;
    }

    /// mask 能否同时广播到 T1 图和 rho 图. 没有 mask 时返回 `true`.
    pub fn mask_is_compatible(&self) -> bool {
        self.mask_broadcasts_to(self.t1.shape()) && self.mask_broadcasts_to(self.rho.shape())
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "io")] {
        use std::fs::File;
        use std::path::Path;
        use ndarray::{ArrayD, OwnedRepr};
        use ndarray_npy::{NpzReader, ReadNpyError, ReadNpzError, ReadableElement};
        use crate::consts::npz;
        use crate::Mask;

        /// 在 npz 归档的文件名中查找 `key` 或 `{key}.npy`.
        fn find_entry<'a>(names: &'a [String], key: &str) -> Option<&'a str> {
            names
                .iter()
                .map(String::as_str)
                .find(|n| *n == key || n.strip_suffix(".npy") == Some(key))
        }

        /// 以元素类型 `T` 读取数组. 若数组的实际类型不是 `T`, 则返回 `Ok(None)`.
        fn read_as<T: ReadableElement>(
            reader: &mut NpzReader<File>,
            name: &str,
        ) -> Result<Option<ArrayD<T>>, ReadNpzError> {
            match reader.by_name::<OwnedRepr<T>, _>(name) {
                Ok(arr) => Ok(Some(arr)),
                Err(ReadNpzError::Npy(ReadNpyError::WrongDescriptor(_))) => Ok(None),
                Err(e) => Err(e),
            }
        }

        /// 读取参数图. `f32` 数组原样读取, `f64` 数组 (numpy 默认类型) 转换为 `f32`.
        fn read_map(reader: &mut NpzReader<File>, name: &str) -> crate::Result<Tensor<f32>> {
            if let Some(arr) = read_as::<f32>(reader, name)? {
                return Ok(arr.into_shared());
            }
            let arr = reader.by_name::<OwnedRepr<f64>, IxDyn>(name)?;
            Ok(arr.mapv(|v| v as f32).into_shared())
        }

        /// 读取 mask. 布尔数组原样读取, 数值数组中非零元素视为 `true`.
        fn read_mask(reader: &mut NpzReader<File>, name: &str) -> crate::Result<Mask> {
            if let Some(arr) = read_as::<bool>(reader, name)? {
                return Ok(arr.into_shared());
            }
            macro_rules! try_numeric {
                ($($t: ty),+) => {
                    $(
                        if let Some(arr) = read_as::<$t>(reader, name)? {
                            return Ok(arr.mapv(|v| v != <$t>::default()).into_shared());
                        }
                    )+
                };
            }
            try_numeric!(u8, i8, u16, i16, u32, i32, u64, i64, f32);
            let arr = reader.by_name::<OwnedRepr<f64>, IxDyn>(name)?;
            Ok(arr.mapv(|v| v != 0.0).into_shared())
        }

        impl QmriData<f32> {
            /// 打开 npz 归档中的定量 MR 数据.
            ///
            /// 归档中名为 `t1`, `rho` 的数组 (可带 `.npy` 后缀) 分别作为 T1 图和 rho 图,
            /// 元素类型可为 `f32` 或 `f64`, 统一转换为 `f32`. 缺失的参数图使用默认值.
            /// 若存在名为 `mask` 的数组, 则作为 mask; 数值 mask 中非零元素视为有效体素.
            pub fn open_npz<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
                let path = path.as_ref();
                log::debug!("Opening qmri archive `{}`", path.display());

                let mut reader = NpzReader::new(File::open(path)?)?;
                let names = reader.names()?;

                let mut load = |key: &str| -> crate::Result<Option<Tensor<f32>>> {
                    match find_entry(&names, key) {
                        Some(name) => read_map(&mut reader, name).map(Some),
                        None => {
                            log::warn!(
                                "`{}` has no `{key}` entry, falling back to default",
                                path.display()
                            );
                            Ok(None)
                        }
                    }
                };
                let t1 = load(npz::T1)?;
                let rho = load(npz::RHO)?;
                let mut ans = Self::new(t1, rho);

                if let Some(name) = find_entry(&names, npz::MASK) {
                    ans.set_mask(read_mask(&mut reader, name)?);
                }
                Ok(ans)
            }
        }
    }
}
