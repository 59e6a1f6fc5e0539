//! 通用常量.

/// npz 归档中各数据项的名称 (不含 `.npy` 后缀).
pub mod npz {
    /// T1 参数图.
    pub const T1: &str = "t1";

    /// rho 参数图.
    pub const RHO: &str = "rho";

    /// 体素 mask.
    pub const MASK: &str = "mask";
}

/// 从 nifti header 导入时使用的 header 键名.
pub mod nifti_keys {
    /// header 字节数.
    pub const SIZEOF_HDR: &str = "sizeof_hdr";

    /// 维度数组, 第 0 项为维数.
    pub const DIM: &str = "dim";

    /// 体素尺寸数组, 第 0 项为 qfac.
    pub const PIXDIM: &str = "pixdim";

    /// 数据类型码.
    pub const DATATYPE: &str = "datatype";

    /// 每个体素的位数.
    pub const BITPIX: &str = "bitpix";

    /// 数据缩放斜率.
    pub const SCL_SLOPE: &str = "scl_slope";

    /// 数据缩放截距.
    pub const SCL_INTER: &str = "scl_inter";

    /// qform 码.
    pub const QFORM_CODE: &str = "qform_code";

    /// sform 码.
    pub const SFORM_CODE: &str = "sform_code";

    /// 四元数参数 `[b, c, d]`.
    pub const QUATERN: &str = "quatern_bcd";

    /// 四元数平移 `[x, y, z]`.
    pub const QOFFSET: &str = "qoffset_xyz";

    /// 仿射变换第一行.
    pub const SROW_X: &str = "srow_x";

    /// 仿射变换第二行.
    pub const SROW_Y: &str = "srow_y";

    /// 仿射变换第三行.
    pub const SROW_Z: &str = "srow_z";

    /// 空间/时间单位码.
    pub const XYZT_UNITS: &str = "xyzt_units";

    /// 描述文本.
    pub const DESCRIP: &str = "descrip";

    /// intent 名称.
    pub const INTENT_NAME: &str = "intent_name";

    /// 辅助文件名.
    pub const AUX_FILE: &str = "aux_file";
}
