use super::{MrData, MrDataAttr, Tensor};
use ndarray::ArrayD;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 图像数据记录, 包括 header, 可选的 mask 和单个图像张量.
///
/// 张量在创建时给出, 之后可以被替换或取走. 取走后所有派生访问器
/// (`shape`, `to_ndarray` 等) 返回 `None`, 而不会 panic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageData<A = f32> {
    base: MrData,
    data: Option<Tensor<A>>,
}

impl<A> MrDataAttr for ImageData<A> {
    #[inline]
    fn mr_data(&self) -> &MrData {
        &self.base
    }

    #[inline]
    fn mr_data_mut(&mut self) -> &mut MrData {
        &mut self.base
    }
}

impl<A> From<Tensor<A>> for ImageData<A> {
    #[inline]
    fn from(data: Tensor<A>) -> Self {
        Self::new(data)
    }
}

impl<A> ImageData<A> {
    /// 以张量 `data` 创建记录. header 为空, 不含 mask.
    #[inline]
    pub fn new(data: Tensor<A>) -> Self {
        Self {
            base: MrData::new(),
            data: Some(data),
        }
    }

    /// 以独占数组 `data` 创建记录. 不复制数据.
    #[inline]
    pub fn from_array(data: ArrayD<A>) -> Self {
        Self::new(data.into_shared())
    }

    /// 获取图像张量. 张量已被取走时返回 `None`.
    #[inline]
    pub fn data(&self) -> Option<&Tensor<A>> {
        self.data.as_ref()
    }

    /// 获取图像张量的可变引用.
    ///
    /// 注意若该张量与外部共享, 就地修改会先触发写时复制.
    #[inline]
    pub fn data_mut(&mut self) -> Option<&mut Tensor<A>> {
        self.data.as_mut()
    }

    /// 替换图像张量.
    #[inline]
    pub fn set_data(&mut self, data: Tensor<A>) {
        self.data = Some(data);
    }

    /// 取走图像张量.
    #[inline]
    pub fn clear_data(&mut self) -> Option<Tensor<A>> {
        self.data.take()
    }

    /// 图像张量各维度的大小.
    #[inline]
    pub fn shape(&self) -> Option<&[usize]> {
        self.data.as_ref().map(|d| d.shape())
    }

    /// 图像张量的维数.
    #[inline]
    pub fn ndim(&self) -> Option<usize> {
        self.data.as_ref().map(|d| d.ndim())
    }

    /// 图像张量的元素个数.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        self.data.as_ref().map(|d| d.len())
    }

    /// 图像张量是否不含任何元素.
    #[inline]
    pub fn is_empty(&self) -> Option<bool> {
        self.data.as_ref().map(|d| d.is_empty())
    }

    /// mask 能否广播到图像张量的形状. mask 或张量任一不存在时返回 `true`.
    #[inline]
    pub fn mask_is_compatible(&self) -> bool {
        self.shape().map_or(true, |sh| self.mask_broadcasts_to(sh))
    }
}

impl<A: Clone> ImageData<A> {
    /// 获得图像张量的一份独立拷贝, 以行优先标准布局存储.
    ///
    /// 返回的数组不与记录共享任何底层数据. 张量已被取走时返回 `None`.
    pub fn to_ndarray(&self) -> Option<ArrayD<A>> {
        self.data
            .as_ref()
            .map(|d| d.as_standard_layout().into_owned())
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "io")] {
        use std::path::Path;
        use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
        use crate::Header;

        impl ImageData<f32> {
            /// 打开 nifti 格式 (`.nii`, `.nii.gz`) 的图像, 数据统一转换为 `f32`.
            ///
            /// nifti 按 `[x, y, z, ...]` 组织数据; 这里将其轴序反转为
            /// `[..., z, y, x]`, 使最后一维在内存中连续. header 由
            /// [`Header::from_nifti`] 填充.
            pub fn open_nifti<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
                let path = path.as_ref();
                log::debug!("Opening nifti image `{}`", path.display());

                let obj = ReaderOptions::new().read_file(path)?;
                let header = Header::from_nifti(obj.header());

                // [x, y, z, ...] -> [..., z, y, x].
                let data = obj.into_volume().into_ndarray::<f32>()?.reversed_axes();

                // The nature of nifti data field layout.
                debug_assert!(data.is_standard_layout());
                let data = data.as_standard_layout().into_owned();
                log::debug!("Loaded nifti image with shape {:?}", data.shape());

                let mut ans = Self::from_array(data);
                ans.set_header(header);
                Ok(ans)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ImageData;
    use crate::{MrDataAttr, Tensor};
    use ndarray::{ArrayD, IxDyn};

    fn ones(shape: &[usize]) -> Tensor<f32> {
        ArrayD::<f32>::ones(IxDyn(shape)).into_shared()
    }

    #[test]
    fn test_image_2x3_ones() {
        let a = ones(&[2, 3]);
        let img = ImageData::new(a.clone());

        assert_eq!(img.shape(), Some([2, 3].as_slice()));
        assert_eq!(img.ndim(), Some(2));
        assert_eq!(img.len(), Some(6));
        assert_eq!(img.is_empty(), Some(false));

        let host = img.to_ndarray().unwrap();
        assert_eq!(host.shape(), &[2, 3]);
        assert!(host.iter().all(|v| *v == 1.0));
        assert!(host.is_standard_layout());
        // 独立拷贝.
        assert_ne!(host.as_ptr(), a.as_ptr());
    }

    #[test]
    fn test_image_data_identity() {
        let a = ones(&[4, 4, 2]);
        let mut img = ImageData::from(a.clone());
        assert_eq!(img.data().unwrap().as_ptr(), a.as_ptr());

        let b = ones(&[3]);
        img.set_data(b.clone());
        assert_eq!(img.data().unwrap().as_ptr(), b.as_ptr());
        assert_eq!(img.shape(), Some([3].as_slice()));
    }

    #[test]
    fn test_image_defaults() {
        let img = ImageData::new(ones(&[2, 2]));
        assert!(img.header().is_empty());
        assert!(img.mask().is_none());
        assert!(img.mask_is_compatible());
    }

    #[test]
    fn test_image_without_data() {
        let mut img = ImageData::from_array(ArrayD::<f32>::zeros(IxDyn(&[5, 5])));
        assert!(img.clear_data().is_some());

        assert!(img.data().is_none());
        assert!(img.data_mut().is_none());
        assert_eq!(img.shape(), None);
        assert_eq!(img.ndim(), None);
        assert_eq!(img.len(), None);
        assert_eq!(img.is_empty(), None);
        assert_eq!(img.to_ndarray(), None);
        assert!(img.clear_data().is_none());
    }

    #[test]
    fn test_image_empty_tensor() {
        let img = ImageData::from_array(ArrayD::<f32>::zeros(IxDyn(&[0, 4])));
        assert_eq!(img.is_empty(), Some(true));
        assert_eq!(img.len(), Some(0));
        assert_eq!(img.shape(), Some([0, 4].as_slice()));
        assert_eq!(img.to_ndarray().map(|a| a.len()), Some(0));
    }

    #[test]
    fn test_image_to_ndarray_non_standard_layout() {
        let a = ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0, 1, 2, 3, 4, 5])
            .unwrap()
            .reversed_axes()
            .into_shared();
        assert!(!a.is_standard_layout());

        let img = ImageData::new(a.clone());
        let host = img.to_ndarray().unwrap();
        assert!(host.is_standard_layout());
        assert_eq!(host, a);
        assert_eq!(host[[2, 1]], 5);
    }

    #[test]
    fn test_image_data_mut_copy_on_write() {
        let a = ones(&[2, 2]);
        let mut img = ImageData::new(a.clone());
        img.data_mut().unwrap()[[0, 0]] = 7.0;

        // 外部持有的张量不受影响.
        assert_eq!(a[[0, 0]], 1.0);
        assert_eq!(img.data().unwrap()[[0, 0]], 7.0);
    }

    #[test]
    fn test_image_mask_compatibility() {
        let mut img = ImageData::new(ones(&[3, 4]));
        img.set_mask(ArrayD::from_elem(IxDyn(&[4]), true).into_shared());
        assert!(img.mask_is_compatible());

        img.set_mask(ArrayD::from_elem(IxDyn(&[3]), false).into_shared());
        assert!(!img.mask_is_compatible());

        // setter 不做校验: 不兼容的 mask 仍被保存.
        assert_eq!(img.mask().map(|m| m.len()), Some(3));

        img.clear_data();
        assert!(img.mask_is_compatible());
    }

    #[cfg(feature = "io")]
    #[test]
    fn test_open_nifti() {
        use crate::consts::nifti_keys::DIM;
        use crate::HeaderValue;
        use ndarray::Array3;
        use nifti::writer::WriterOptions;

        let _ = simple_logger::SimpleLogger::new().init();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t1w.nii");

        // [x, y, z]
        let vol = Array3::<f32>::from_shape_fn((4, 3, 2), |(x, y, z)| {
            (x + 10 * y + 100 * z) as f32
        });
        WriterOptions::new(&path).write_nifti(&vol).unwrap();

        let img = ImageData::open_nifti(&path).unwrap();
        assert_eq!(img.shape(), Some([2, 3, 4].as_slice()));
        let data = img.data().unwrap();
        assert_eq!(data[[0, 0, 1]], 1.0);
        assert_eq!(data[[0, 2, 0]], 20.0);
        assert_eq!(data[[1, 2, 3]], 123.0);

        let dim = img.header().get(DIM).and_then(HeaderValue::as_list).unwrap();
        assert_eq!(&dim[..4], &[3i64, 4, 3, 2].map(HeaderValue::Int));
        assert!(img.mask().is_none());
    }

    #[cfg(feature = "io")]
    #[test]
    fn test_open_nifti_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageData::open_nifti(dir.path().join("missing.nii")).is_err());
    }
}
