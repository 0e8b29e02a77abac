//! 分页排版服务 - 业务能力层
//!
//! 只负责"把摘要文本排到固定尺寸的页面上"，不关心输出格式（PDF 编码在基础设施层）
//!
//! ## 排版规则
//!
//! - 页面 612×792（US Letter），左/上/右边距 50
//! - 底部安全边距 50：只有光标 y ≥ 50 时才放置文本行
//! - 页眉只出现在第 1 页，占用 110 个单位：
//!   产品标题（粗体 20，居中）、原标题行（14）、作者行（12）
//! - 正文字号 12，行距 15
//! - 正文使用等宽字体（字宽 0.6 em），按可用宽度预先折行，
//!   因此每页能放多少行是确定的
//!
//! ## 分页算法
//!
//! 对每一行：如果光标已经低于底部边距，先开新页（光标回到上边距），
//! 然后在光标处放置该行，光标下移一个行距。

use crate::models::{DocumentMetadata, FontStyle, Page, PaginatedDocument, PlacedLine};
use tracing::debug;

/// 页眉中的产品标题
pub const PRODUCT_TITLE: &str = "Summary by Book Leizure";

/// 等宽字体的字宽（相对于字号）
pub const GLYPH_WIDTH_EM: f32 = 0.6;

const TITLE_FONT_SIZE: f32 = 20.0;
const ORIGINAL_TITLE_FONT_SIZE: f32 = 14.0;
const AUTHOR_FONT_SIZE: f32 = 12.0;
const TITLE_ADVANCE: f32 = 35.0;
const ORIGINAL_TITLE_ADVANCE: f32 = 22.0;
const TAB_WIDTH: usize = 4;

/// 排版参数
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    /// 左/上/右边距
    pub margin: f32,
    /// 底部安全边距
    pub bottom_margin: f32,
    /// 第 1 页页眉高度
    pub header_height: f32,
    pub body_font_size: f32,
    pub line_advance: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 50.0,
            bottom_margin: 50.0,
            header_height: 110.0,
            body_font_size: 12.0,
            line_advance: 15.0,
        }
    }
}

impl PageLayout {
    /// 页面可用宽度
    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// 指定字号下一行能容纳的字符数
    pub fn chars_per_line(&self, font_size: f32) -> usize {
        let glyph_width = font_size * GLYPH_WIDTH_EM;
        ((self.usable_width() / glyph_width).floor() as usize).max(1)
    }

    /// 页面顶部的光标位置
    pub fn top_cursor(&self) -> f32 {
        self.page_height - self.margin
    }

    /// 第 1 页正文开始的光标位置
    pub fn first_body_cursor(&self) -> f32 {
        self.top_cursor() - self.header_height
    }

    /// 第 1 页（页眉之后）可放置的正文行数
    pub fn header_page_capacity(&self) -> usize {
        self.capacity_from(self.first_body_cursor())
    }

    /// 后续页面可放置的正文行数
    pub fn page_capacity(&self) -> usize {
        self.capacity_from(self.top_cursor())
    }

    fn capacity_from(&self, start: f32) -> usize {
        if start < self.bottom_margin {
            return 0;
        }
        ((start - self.bottom_margin) / self.line_advance).floor() as usize + 1
    }
}

/// 分页排版引擎
#[derive(Debug, Clone, Default)]
pub struct PageLayoutEngine {
    layout: PageLayout,
}

impl PageLayoutEngine {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// 将摘要排版为分页文档
    ///
    /// 空摘要也会生成一页（只有页眉）。每一行恰好出现在一个页面上，顺序与原文一致。
    pub fn render(&self, summary: &str, metadata: &DocumentMetadata) -> PaginatedDocument {
        let layout = &self.layout;
        let mut document = PaginatedDocument::new();

        let mut current = self.header_page(metadata);
        let mut cursor = layout.first_body_cursor();

        for text in self.wrap_summary(summary) {
            if cursor < layout.bottom_margin {
                let full = std::mem::replace(&mut current, self.blank_page());
                document.push_page(full);
                cursor = layout.top_cursor();
            }

            current.lines.push(PlacedLine {
                text,
                x: layout.margin,
                y: cursor,
                font_size: layout.body_font_size,
                style: FontStyle::Regular,
            });
            cursor -= layout.line_advance;
        }
        document.push_page(current);

        debug!("排版完成: {} 页", document.page_count());
        document
    }

    /// 把摘要切成逻辑行并按可用宽度折行
    pub fn wrap_summary(&self, summary: &str) -> Vec<String> {
        let max_chars = self.layout.chars_per_line(self.layout.body_font_size);
        summary
            .lines()
            .flat_map(|line| wrap_line(line, max_chars))
            .collect()
    }

    fn blank_page(&self) -> Page {
        Page::new(self.layout.page_width, self.layout.page_height)
    }

    fn header_page(&self, metadata: &DocumentMetadata) -> Page {
        let layout = &self.layout;
        let mut page = self.blank_page();
        let mut cursor = layout.top_cursor();

        let title = fit_to_width(PRODUCT_TITLE, layout.chars_per_line(TITLE_FONT_SIZE));
        let title_width = title.chars().count() as f32 * TITLE_FONT_SIZE * GLYPH_WIDTH_EM;
        page.lines.push(PlacedLine {
            x: ((layout.page_width - title_width) / 2.0).max(layout.margin),
            text: title,
            y: cursor,
            font_size: TITLE_FONT_SIZE,
            style: FontStyle::Bold,
        });
        cursor -= TITLE_ADVANCE;

        page.lines.push(PlacedLine {
            text: fit_to_width(
                &format!("Original title: {}", metadata.title),
                layout.chars_per_line(ORIGINAL_TITLE_FONT_SIZE),
            ),
            x: layout.margin,
            y: cursor,
            font_size: ORIGINAL_TITLE_FONT_SIZE,
            style: FontStyle::Regular,
        });
        cursor -= ORIGINAL_TITLE_ADVANCE;

        page.lines.push(PlacedLine {
            text: fit_to_width(
                &format!("Author: {}", metadata.author),
                layout.chars_per_line(AUTHOR_FONT_SIZE),
            ),
            x: layout.margin,
            y: cursor,
            font_size: AUTHOR_FONT_SIZE,
            style: FontStyle::Regular,
        });

        page
    }
}

/// 按单词折行，超长单词强制拆分；空行保留为一个空行位
///
/// 行首缩进保留在第一段上，并计入行宽。
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let line = line.trim_end().replace('\t', &" ".repeat(TAB_WIDTH));
    if line.chars().count() <= max_chars {
        return vec![line];
    }

    let indent_len = line.chars().take_while(|c| c.is_whitespace()).count();
    let mut wrapped = Vec::new();
    let mut current: String = if indent_len < max_chars {
        line.chars().take(indent_len).collect()
    } else {
        String::new()
    };
    let mut current_len = current.chars().count();
    let mut has_words = false;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        loop {
            let separator = usize::from(has_words);
            let room = max_chars.saturating_sub(current_len + separator);
            if word.len() <= room {
                if has_words {
                    current.push(' ');
                }
                current_len += separator + word.len();
                current.extend(word.iter());
                has_words = true;
                break;
            }

            if has_words {
                // 放不下：收尾当前行，换行重试
                wrapped.push(std::mem::take(&mut current));
                current_len = 0;
                has_words = false;
                continue;
            }

            // 整行都放不下的单词按剩余宽度切块
            let rest = word.split_off(room);
            current.extend(word.iter());
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
            word = rest;
        }
    }

    if has_words {
        wrapped.push(current);
    }
    wrapped
}

/// 截断到指定字符数，超出部分以 "..." 结尾
fn fit_to_width(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    text.chars().take(keep).collect::<String>() + "..."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> DocumentMetadata {
        DocumentMetadata {
            page_count: 10,
            title: "Sample".to_string(),
            author: "A. Writer".to_string(),
        }
    }

    fn summary_of(n: usize) -> String {
        (0..n)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn expected_pages(n: usize, header_capacity: usize, capacity: usize) -> usize {
        if n <= header_capacity {
            1
        } else {
            (n - header_capacity).div_ceil(capacity) + 1
        }
    }

    #[test]
    fn test_layout_capacities() {
        let layout = PageLayout::default();
        assert_eq!(layout.usable_width(), 512.0);
        assert_eq!(layout.chars_per_line(12.0), 71);
        assert_eq!(layout.first_body_cursor(), 632.0);
        assert_eq!(layout.header_page_capacity(), 39);
        assert_eq!(layout.page_capacity(), 47);
    }

    #[test]
    fn test_empty_summary_has_header_page() {
        let engine = PageLayoutEngine::default();
        let document = engine.render("", &metadata());

        assert_eq!(document.page_count(), 1);
        let page = &document.pages()[0];
        assert_eq!(page.lines.len(), 3);
        assert_eq!(page.lines[0].text, PRODUCT_TITLE);
        assert_eq!(page.lines[0].style, FontStyle::Bold);
        assert_eq!(page.lines[0].font_size, 20.0);
        assert_eq!(page.lines[1].text, "Original title: Sample");
        assert_eq!(page.lines[1].font_size, 14.0);
        assert_eq!(page.lines[2].text, "Author: A. Writer");
        assert_eq!(page.lines[2].font_size, 12.0);
    }

    #[test]
    fn test_page_count_formula() {
        let engine = PageLayoutEngine::default();
        let header_capacity = engine.layout().header_page_capacity();
        let capacity = engine.layout().page_capacity();

        for n in [0, 1, 38, 39, 40, 86, 87, 133, 134, 500] {
            let document = engine.render(&summary_of(n), &metadata());
            assert_eq!(
                document.page_count(),
                expected_pages(n, header_capacity, capacity),
                "N = {}",
                n
            );
        }
    }

    #[test]
    fn test_lines_in_order_and_above_bottom_margin() {
        let engine = PageLayoutEngine::default();
        let document = engine.render(&summary_of(200), &metadata());

        let body: Vec<&str> = document
            .lines()
            .skip(3)
            .map(|line| line.text.as_str())
            .collect();
        let expected: Vec<String> = (0..200).map(|i| format!("line {}", i)).collect();
        assert_eq!(body, expected);

        for line in document.lines() {
            assert!(line.y >= 50.0, "y = {}", line.y);
        }
    }

    #[test]
    fn test_header_only_on_first_page() {
        let engine = PageLayoutEngine::default();
        let document = engine.render(&summary_of(100), &metadata());
        assert!(document.page_count() > 1);

        for page in &document.pages()[1..] {
            assert!(page.lines.iter().all(|l| l.style == FontStyle::Regular));
            assert!(page.lines.iter().all(|l| l.font_size == 12.0));
            assert_eq!(page.lines[0].y, 742.0);
            assert!(!page.lines.iter().any(|l| l.text.starts_with("Author: ")));
        }
        assert_eq!(document.pages()[0].lines[3].y, 632.0);
    }

    #[test]
    fn test_blank_lines_take_a_slot() {
        let engine = PageLayoutEngine::default();
        let document = engine.render("Intro\n\nConclusion\n", &metadata());
        let body: Vec<&str> = document.lines().skip(3).map(|l| l.text.as_str()).collect();
        assert_eq!(body, vec!["Intro", "", "Conclusion"]);
    }

    #[test]
    fn test_long_lines_are_wrapped() {
        let engine = PageLayoutEngine::default();
        let long_line = vec!["word"; 40].join(" ");
        let wrapped = engine.wrap_summary(&long_line);

        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 71));
        assert_eq!(wrapped.join(" "), long_line);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = "x".repeat(150);
        let wrapped = wrap_line(&format!("see {} end", word), 71);
        assert_eq!(wrapped[0], "see");
        assert_eq!(wrapped[1].len(), 71);
        assert_eq!(wrapped[2].len(), 71);
        assert_eq!(wrapped[3], "xxxxxxxx end");
    }

    #[test]
    fn test_wrapped_line_keeps_indentation() {
        let line = format!("    - {}", vec!["item"; 20].join(" "));
        let wrapped = wrap_line(&line, 30);

        assert_eq!(wrapped[0], "    - item item item item item");
        assert!(wrapped[1].starts_with("item"));
        assert!(wrapped.iter().all(|l| l.chars().count() <= 30));

        let tabbed = wrap_line(&format!("\t{}", "y".repeat(40)), 30);
        assert_eq!(tabbed[0], format!("    {}", "y".repeat(26)));
        assert_eq!(tabbed[1], "y".repeat(14));
    }

    #[test]
    fn test_long_header_is_truncated() {
        let engine = PageLayoutEngine::default();
        let metadata = DocumentMetadata {
            title: "T".repeat(200),
            ..metadata()
        };
        let document = engine.render("", &metadata);
        let title_line = &document.pages()[0].lines[1].text;
        assert_eq!(title_line.chars().count(), 60);
        assert!(title_line.ends_with("..."));
    }
}
