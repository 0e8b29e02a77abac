//! 分页文档模型
//!
//! 坐标采用 PDF 用户空间：原点在左下角，y 轴向上。

use serde::Serialize;

/// 字体样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// 已放置到页面上的一行文本
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub style: FontStyle,
}

/// 单个页面
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub lines: Vec<PlacedLine>,
}

impl Page {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
        }
    }
}

/// 分页文档，页面只追加、不重排
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaginatedDocument {
    pages: Vec<Page>,
}

impl PaginatedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 按顺序遍历所有页面上的文本行
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}
