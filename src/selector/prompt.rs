//! 人工输入：候选列表展示与编号选择
//!
//! HumanPrompt 是人工介入的唯一入口（选择候选 / 自由文本澄清）。LinePrompt 基于任意
//! AsyncBufRead + AsyncWrite 实现，生产环境接 ConsoleInput/stdout，测试接内存缓冲。
//! 列表只输出一次；每次无效输入输出一行错误并重新提问，没有次数上限。

use async_trait::async_trait;
use crossterm::style::Stylize;
use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Stdout};

use crate::selector::{Candidate, ConsoleInput};

/// 人工输入失败（输入流关闭或 I/O 错误）；无效编号不算错误，会重新提问
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed before a valid answer was given")]
    InputClosed,
    #[error("prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// 单次编号输入的校验结果
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("not an integer: {0:?}")]
    NotANumber(String),
    #[error("{value} is outside 1..={max}")]
    OutOfRange { value: i64, max: usize },
}

/// 解析 1-based 编号，返回 0-based 下标
pub fn parse_choice(input: &str, n: usize) -> Result<usize, ChoiceError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ChoiceError::NotANumber(trimmed.to_string()))?;
    if value < 1 || value as u64 > n as u64 {
        return Err(ChoiceError::OutOfRange { value, max: n });
    }
    Ok(value as usize - 1)
}

/// 候选列表展示样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStyle {
    /// 每行 "1. 姓名 - 标题 - 链接"
    #[default]
    Plain,
    /// 带标题的对齐表格（可着色）
    Table,
}

/// 人工介入接口：选择候选（返回 0-based 下标）与自由文本提问
#[async_trait]
pub trait HumanPrompt: Send {
    /// 展示候选并阻塞等待合法编号；candidates 至少两条
    async fn choose(&mut self, candidates: &[Candidate]) -> Result<usize, PromptError>;

    /// 向用户提问并返回一行回答（已去除换行）
    async fn ask(&mut self, question: &str) -> Result<String, PromptError>;
}

#[async_trait]
impl<P: HumanPrompt + ?Sized> HumanPrompt for Box<P> {
    async fn choose(&mut self, candidates: &[Candidate]) -> Result<usize, PromptError> {
        (**self).choose(candidates).await
    }

    async fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        (**self).ask(question).await
    }
}

/// 按行读写的人工输入实现
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
    style: ListingStyle,
    color: bool,
}

impl LinePrompt<ConsoleInput, Stdout> {
    /// 控制台：stdin 由独立线程读取（等待可随时取消），stdout 输出
    pub fn stdio(style: ListingStyle, color: bool) -> Self {
        Self::new(ConsoleInput::stdin(), tokio::io::stdout(), style).with_color(color)
    }
}

impl<R, W> LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, style: ListingStyle) -> Self {
        Self {
            reader,
            writer,
            style,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// 取回输出端（测试中检查写出的内容）
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn listing(&self, candidates: &[Candidate]) -> String {
        match self.style {
            ListingStyle::Plain => render_plain(candidates),
            ListingStyle::Table => render_table(candidates, self.color),
        }
    }

    fn question(&self, n: usize) -> String {
        match self.style {
            ListingStyle::Plain => "Enter the number of the profile to select: ".to_string(),
            ListingStyle::Table => format!("Enter a number between 1 and {n}: "),
        }
    }

    fn rejection(&self, err: &ChoiceError, n: usize) -> String {
        let text = match (self.style, err) {
            (_, ChoiceError::NotANumber(_)) => {
                "Invalid input. Please enter a valid integer.".to_string()
            }
            (ListingStyle::Plain, ChoiceError::OutOfRange { .. }) => {
                format!("Please enter a number between 1 and {n}.")
            }
            (ListingStyle::Table, ChoiceError::OutOfRange { .. }) => {
                format!("Choice out of range. Please enter a number between 1 and {n}.")
            }
        };
        if self.color && self.style == ListingStyle::Table {
            format!("{}\n", text.red())
        } else {
            format!("{text}\n")
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), PromptError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(PromptError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[async_trait]
impl<R, W> HumanPrompt for LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn choose(&mut self, candidates: &[Candidate]) -> Result<usize, PromptError> {
        let n = candidates.len();
        let listing = self.listing(candidates);
        self.write(&listing).await?;
        loop {
            let question = self.question(n);
            self.write(&question).await?;
            let line = self.read_line().await?;
            match parse_choice(&line, n) {
                Ok(index) => return Ok(index),
                Err(e) => {
                    tracing::debug!(error = %e, "rejected selection input");
                    let msg = self.rejection(&e, n);
                    self.write(&msg).await?;
                }
            }
        }
    }

    async fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        self.write(&format!("{question}\n> ")).await?;
        self.read_line().await
    }
}

/// 纯文本列表
pub fn render_plain(candidates: &[Candidate]) -> String {
    let mut out = String::from("Multiple profiles found:\n");
    for (i, c) in candidates.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {} - {}\n",
            i + 1,
            c.display_name(),
            c.subtitle(),
            c.link()
        ));
    }
    out
}

/// 对齐表格：Index / Name / Headline / URL
pub fn render_table(candidates: &[Candidate], color: bool) -> String {
    const HEADERS: [&str; 4] = ["Index", "Name", "Headline", "URL"];
    let rows: Vec<[String; 4]> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            [
                (i + 1).to_string(),
                c.display_name().to_string(),
                c.subtitle().to_string(),
                c.link().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::from("Multiple profiles found. Please select one:\n");
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(col, (h, w))| {
            let cell = if col == 0 {
                format!("{h:>w$}")
            } else {
                format!("{h:<w$}")
            };
            if color {
                cell.bold().to_string()
            } else {
                cell
            }
        })
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(col, (cell, w))| {
                let padded = if col == 0 {
                    format!("{cell:>w$}")
                } else {
                    format!("{cell:<w$}")
                };
                if !color {
                    return padded;
                }
                match col {
                    0 => padded.cyan().to_string(),
                    1 => padded.magenta().to_string(),
                    2 => padded.green().to_string(),
                    _ => padded.blue().to_string(),
                }
            })
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}
