use crate::tensor::Tensor;
use std::fmt;

/// 阶数≤2时逐元素打印；特征图等高阶张量只打印形状与统计摘要
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shape = self.shape();
        match shape.len() {
            0 => {
                let value = self.data.iter().next().copied().unwrap_or_default();
                writeln!(f, "{value:8.4}\n形状: {shape:?}")
            }
            1 => {
                let row = self
                    .data
                    .iter()
                    .map(|v| format!("{v:8.4}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "[{row}]\n形状: {shape:?}")
            }
            2 => {
                let rows = self
                    .data
                    .outer_iter()
                    .map(|r| {
                        let cols = r.iter().map(|v| format!("{v:8.4}")).collect::<Vec<_>>();
                        format!("[{}]", cols.join(", "))
                    })
                    .collect::<Vec<_>>();
                writeln!(f, "[{}]\n形状: {shape:?}", rows.join(",\n "))
            }
            _ => {
                if self.size() == 0 {
                    return writeln!(f, "<空张量，形状：{shape:?}>");
                }
                let min = self.data.iter().copied().fold(f32::INFINITY, f32::min);
                let max = self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let mean = self.data.iter().sum::<f32>() / self.size() as f32;
                writeln!(
                    f,
                    "<阶数为{}的张量，形状：{shape:?}，min={min:.4}，max={max:.4}，mean={mean:.4}>",
                    shape.len()
                )
            }
        }
    }
}
