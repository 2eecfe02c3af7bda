/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Conv2d (2D 卷积) 层 - PyTorch 风格 API，无偏置
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, out_channels, H', W']
 *
 * 计算：output = conv2d(x, K)
 * 候选操作中的卷积后面总跟着 BatchNorm，偏置是多余的，故不提供。
 */

use crate::errors::NasError;
use crate::nn::functional::{self, Conv2dParams};
use crate::nn::{Init, Module};
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// Conv2d (2D 卷积) 层
///
/// # 使用示例
/// ```ignore
/// let mut rng = StdRng::seed_from_u64(42);
/// // 逐通道 3x3 卷积
/// let dw = Conv2d::new(16, 16, (3, 3), Conv2dParams::new((1, 1), (1, 1)).with_groups(16), &mut rng)?;
/// let y = dw.forward(&x)?;
/// ```
#[derive(Debug, Clone)]
pub struct Conv2d {
    /// 卷积核参数 [out_channels, in_channels / groups, kernel_h, kernel_w]
    kernel: Tensor,
    in_channels: usize,
    out_channels: usize,
    kernel_size: (usize, usize),
    params: Conv2dParams,
}

impl Conv2d {
    /// 创建新的 Conv2d 层，卷积核使用 Kaiming 初始化
    ///
    /// # 参数
    /// - `in_channels`: 输入通道数
    /// - `out_channels`: 输出通道数
    /// - `kernel_size`: 卷积核大小 (kH, kW)
    /// - `params`: 步长/填充/空洞/分组
    /// - `rng`: 随机数生成器（固定种子可确保可重复性）
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        params: Conv2dParams,
        rng: &mut StdRng,
    ) -> Result<Self, NasError> {
        let groups = params.groups;
        if in_channels == 0 || out_channels == 0 {
            return Err(NasError::InvalidConfig(format!(
                "Conv2d 通道数必须为正，得到 in={in_channels}，out={out_channels}"
            )));
        }
        if groups == 0 || in_channels % groups != 0 || out_channels % groups != 0 {
            return Err(NasError::InvalidConfig(format!(
                "groups={groups} 必须同时整除输入通道数 {in_channels} 与输出通道数 {out_channels}"
            )));
        }
        let (k_h, k_w) = kernel_size;
        if k_h == 0 || k_w == 0 {
            return Err(NasError::InvalidConfig(format!(
                "Conv2d 卷积核尺寸必须为正，得到 {kernel_size:?}"
            )));
        }
        let (s_h, s_w) = params.stride;
        let (d_h, d_w) = params.dilation;
        if s_h == 0 || s_w == 0 || d_h == 0 || d_w == 0 {
            return Err(NasError::InvalidConfig(format!(
                "Conv2d 步长与空洞必须为正，得到 stride={:?}，dilation={:?}",
                params.stride, params.dilation
            )));
        }

        let kernel = Init::Kaiming.generate_with_rng(
            &[out_channels, in_channels / groups, k_h, k_w],
            rng,
        );

        Ok(Self {
            kernel,
            in_channels,
            out_channels,
            kernel_size,
            params,
        })
    }

    /// 用给定的卷积核创建 Conv2d 层（测试/加载已有参数时使用）
    pub fn from_kernel(kernel: Tensor, params: Conv2dParams) -> Result<Self, NasError> {
        let shape = kernel.shape();
        if shape.len() != 4 {
            return Err(NasError::InvalidInput(format!(
                "卷积核必须是 4D [C_out, C_in/groups, kH, kW]，得到 {shape:?}"
            )));
        }
        let (out_channels, in_channels) = (shape[0], shape[1] * params.groups);
        let kernel_size = (shape[2], shape[3]);
        Ok(Self {
            kernel,
            in_channels,
            out_channels,
            kernel_size,
            params,
        })
    }

    /// 前向传播：`conv2d(x, K)`
    ///
    /// # 参数
    /// - `x`: 输入，形状 [batch_size, in_channels, H, W]
    ///
    /// # 返回
    /// 输出，形状 [batch_size, out_channels, H', W']
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NasError> {
        functional::conv2d(x, &self.kernel, self.params)
    }

    /// 不执行计算，仅推导输出形状
    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        if input_shape.len() != 4 {
            return Err(NasError::InvalidInput(format!(
                "Conv2d 输入必须是 4D [batch, C, H, W]，得到 {input_shape:?}"
            )));
        }
        if input_shape[1] != self.in_channels {
            let mut expected = input_shape.to_vec();
            expected[1] = self.in_channels;
            return Err(NasError::ShapeMismatch {
                expected,
                got: input_shape.to_vec(),
                message: format!("Conv2d 需要 {} 通道的输入", self.in_channels),
            });
        }
        let (k_h, k_w) = self.kernel_size;
        let out_h = functional::conv2d_output_size(
            input_shape[2],
            k_h,
            self.params.stride.0,
            self.params.padding.0,
            self.params.dilation.0,
        );
        let out_w = functional::conv2d_output_size(
            input_shape[3],
            k_w,
            self.params.stride.1,
            self.params.padding.1,
            self.params.dilation.1,
        );
        match (out_h, out_w) {
            (Some(h), Some(w)) if h > 0 && w > 0 => {
                Ok(vec![input_shape[0], self.out_channels, h, w])
            }
            _ => Err(NasError::InvalidInput(format!(
                "卷积输出尺寸无效：输入 {input_shape:?}，核 {k_h}x{k_w}，参数 {:?}",
                self.params
            ))),
        }
    }

    pub const fn kernel(&self) -> &Tensor {
        &self.kernel
    }

    pub const fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub const fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub const fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub const fn params(&self) -> Conv2dParams {
        self.params
    }
}

impl Module for Conv2d {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.kernel]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.kernel]
    }
}
