//! 自由格式的 header 元信息.

use std::collections::btree_map::{self, BTreeMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 单个 header 元信息的值.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeaderValue {
    /// 布尔值.
    Bool(bool),

    /// 整数.
    Int(i64),

    /// 浮点数.
    Float(f64),

    /// 文本.
    Text(String),

    /// 值列表, 元素类型可以不同.
    List(Vec<HeaderValue>),

    /// 嵌套的元信息分组, 如序列参数.
    Map(Header),
}

impl HeaderValue {
    /// 若为布尔值则返回之.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 若为整数则返回之.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// 若为数值则以 `f64` 返回. 整数会被转换.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// 若为文本则返回之.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 若为列表则返回之.
    #[inline]
    pub fn as_list(&self) -> Option<&[HeaderValue]> {
        match self {
            Self::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// 若为嵌套分组则返回之.
    #[inline]
    pub fn as_map(&self) -> Option<&Header> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// 若为嵌套分组则返回其可变引用.
    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut Header> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_header_value {
    ($($t: ty => $variant: ident as $conv: ty),+ $(,)?) => {
        $(
            impl From<$t> for HeaderValue {
                #[inline]
                fn from(value: $t) -> Self {
                    Self::$variant(<$conv>::from(value))
                }
            }
        )+
    };
}

impl_from_for_header_value!(
    bool => Bool as bool,
    i64 => Int as i64,
    i32 => Int as i64,
    i16 => Int as i64,
    u16 => Int as i64,
    u8 => Int as i64,
    f64 => Float as f64,
    f32 => Float as f64,
    String => Text as String,
    &str => Text as String,
    Header => Map as Header,
);

impl<T: Into<HeaderValue>> From<Vec<T>> for HeaderValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<HeaderValue>, const N: usize> From<[T; N]> for HeaderValue {
    fn from(value: [T; N]) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// 从字符串键到任意元信息值的映射. 键按字典序排列.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header(BTreeMap<String, HeaderValue>);

impl Header {
    /// 创建空 header.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取键 `key` 对应的值.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.0.get(key)
    }

    /// 获取键 `key` 对应的值, 并可就地修改.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut HeaderValue> {
        self.0.get_mut(key)
    }

    /// 插入一项元信息. 若键已存在, 则返回旧值.
    #[inline]
    pub fn insert<K: Into<String>, V: Into<HeaderValue>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<HeaderValue> {
        self.0.insert(key.into(), value.into())
    }

    /// 移除一项元信息并返回其值.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<HeaderValue> {
        self.0.remove(key)
    }

    /// 是否存在键 `key`.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// 元信息条数.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按键的字典序迭代所有元信息.
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, HeaderValue> {
        self.0.iter()
    }

    /// 按字典序迭代所有键.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> FromIterator<(K, V)> for Header {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> Extend<(K, V)> for Header {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = (&'a String, &'a HeaderValue);
    type IntoIter = btree_map::Iter<'a, String, HeaderValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Header {
    type Item = (String, HeaderValue);
    type IntoIter = btree_map::IntoIter<String, HeaderValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "io")] {
        use crate::consts::nifti_keys::*;
        use nifti::NiftiHeader;

        /// 去掉定长字节数组末尾的 `\0` 填充, 按 (有损) UTF-8 解码.
        fn text(bytes: &[u8]) -> HeaderValue {
            let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
            HeaderValue::Text(String::from_utf8_lossy(&bytes[..end]).into_owned())
        }

        impl Header {
            /// 从 nifti-1 header 导入常用字段. 键名见 [`crate::consts::nifti_keys`].
            ///
            /// 数组字段保持 nifti 的原始顺序 (`[x, y, z, ...]`), 不做轴变换.
            pub fn from_nifti(h: &NiftiHeader) -> Self {
                let mut ans = Self::new();
                ans.insert(SIZEOF_HDR, i64::from(h.sizeof_hdr));
                ans.insert(DIM, h.dim.map(i64::from));
                ans.insert(PIXDIM, h.pixdim.map(f64::from));
                ans.insert(DATATYPE, i64::from(h.datatype));
                ans.insert(BITPIX, i64::from(h.bitpix));
                ans.insert(SCL_SLOPE, f64::from(h.scl_slope));
                ans.insert(SCL_INTER, f64::from(h.scl_inter));
                ans.insert(QFORM_CODE, i64::from(h.qform_code));
                ans.insert(SFORM_CODE, i64::from(h.sform_code));
                ans.insert(QUATERN, [h.quatern_b, h.quatern_c, h.quatern_d]);
                ans.insert(QOFFSET, [h.quatern_x, h.quatern_y, h.quatern_z]);
                ans.insert(SROW_X, h.srow_x);
                ans.insert(SROW_Y, h.srow_y);
                ans.insert(SROW_Z, h.srow_z);
                ans.insert(XYZT_UNITS, i64::from(h.xyzt_units));
                ans.insert(DESCRIP, text(&h.descrip));
                ans.insert(INTENT_NAME, text(&h.intent_name));
                ans.insert(AUX_FILE, text(&h.aux_file));
                ans
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Header, HeaderValue};

    #[test]
    fn test_header_value_conversion() {
        assert_eq!(HeaderValue::from(true).as_bool(), Some(true));
        assert_eq!(HeaderValue::from(3i32).as_int(), Some(3));
        assert_eq!(HeaderValue::from(3i32).as_float(), Some(3.0));
        assert_eq!(HeaderValue::from(0.5f32).as_float(), Some(0.5));
        assert_eq!(HeaderValue::from("T1w").as_text(), Some("T1w"));
        assert_eq!(HeaderValue::from("T1w").as_int(), None);

        let v = HeaderValue::from(vec![1i64, 2, 3]);
        assert_eq!(v.as_list().map(<[_]>::len), Some(3));
        assert_eq!(v.as_list().unwrap()[2], HeaderValue::Int(3));
    }

    #[test]
    fn test_header_map_ops() {
        let mut h = Header::new();
        assert!(h.is_empty());
        assert_eq!(h.insert("flip_angle", 8.0), None);
        assert_eq!(h.insert("flip_angle", 10.0), Some(HeaderValue::Float(8.0)));
        h.insert("b0", 3.0);
        h.insert("vendor", "unknown");

        assert_eq!(h.len(), 3);
        assert!(h.contains_key("b0"));
        assert_eq!(h.keys().collect::<Vec<_>>(), ["b0", "flip_angle", "vendor"]);

        if let Some(HeaderValue::Float(f)) = h.get_mut("b0") {
            *f = 1.5;
        }
        assert_eq!(h.get("b0").and_then(HeaderValue::as_float), Some(1.5));

        assert_eq!(h.remove("vendor"), Some(HeaderValue::from("unknown")));
        assert!(!h.contains_key("vendor"));

        h.extend([("te", 0.01)]);
        assert_eq!((&h).into_iter().count(), 3);
    }

    #[test]
    fn test_header_nested_map() {
        let seq: Header = [("tr", 0.01), ("te", 0.002)].into_iter().collect();
        let mut h = Header::new();
        h.insert("sequence", seq.clone());
        h.insert("field_strength", 3.0);

        let got = h.get("sequence").and_then(HeaderValue::as_map).unwrap();
        assert_eq!(got, &seq);
        assert_eq!(got.get("te").and_then(HeaderValue::as_float), Some(0.002));
        assert_eq!(h.get("field_strength").and_then(HeaderValue::as_map), None);

        h.get_mut("sequence")
            .and_then(HeaderValue::as_map_mut)
            .unwrap()
            .insert("flip_angle", 8i32);
        let got = h.get("sequence").and_then(HeaderValue::as_map).unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got.get("flip_angle"), Some(&HeaderValue::Int(8)));
    }

    #[cfg(feature = "io")]
    #[test]
    fn test_header_from_nifti() {
        use crate::consts::nifti_keys::*;

        let mut nh = nifti::NiftiHeader::default();
        nh.dim = [3, 4, 5, 6, 1, 1, 1, 1];
        nh.pixdim = [1.0, 0.5, 0.5, 2.0, 1.0, 1.0, 1.0, 1.0];
        nh.intent_name[..4].copy_from_slice(b"qmri");

        let h = Header::from_nifti(&nh);
        let dim = h.get(DIM).and_then(HeaderValue::as_list).unwrap();
        assert_eq!(dim.len(), 8);
        assert_eq!(dim[0], HeaderValue::Int(3));
        assert_eq!(dim[3], HeaderValue::Int(6));

        let pixdim = h.get(PIXDIM).and_then(HeaderValue::as_list).unwrap();
        assert_eq!(pixdim[1].as_float(), Some(0.5));
        assert_eq!(pixdim[3].as_float(), Some(2.0));

        assert_eq!(h.get(INTENT_NAME).and_then(HeaderValue::as_text), Some("qmri"));
        assert!(h.contains_key(SROW_Z));
    }
}
