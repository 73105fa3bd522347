use serde_json::json;

use crate::config::MenuConfig;
use crate::error::{LayoutError, Result};
use crate::geometry::Rect;
use crate::layout::DrawContext;
use crate::logging::{LogLevel, emit, json_kv, json_str};
use crate::metrics::{LayoutMetrics, MetricSnapshot};
use crate::property::PropertyStore;
use crate::render::Renderer;

use super::loader::FeatureLoader;
use super::page::Page;

const TARGET: &str = "config_grid::menu";

/// Hands out text-input trigger codes in increasing order.
#[derive(Debug, Clone)]
pub struct CodeAllocator {
    next: u32,
}

impl CodeAllocator {
    pub fn new(start: u32) -> Self {
        Self { next: start }
    }

    /// The code the next call to [`CodeAllocator::allocate`] will return.
    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn allocate(&mut self) -> u32 {
        let code = self.next;
        self.next = self.next.saturating_add(1);
        code
    }
}

/// A set of titled pages, one of which is active and drawn.
pub struct Menu {
    pages: Vec<Page>,
    active: Option<usize>,
    codes: CodeAllocator,
    config: MenuConfig,
    metrics: LayoutMetrics,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(MenuConfig::default())
    }
}

impl Menu {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            pages: Vec::new(),
            active: None,
            codes: CodeAllocator::new(config.text_input_code_start),
            config,
            metrics: LayoutMetrics::new(),
        }
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Add an empty page. The first page added becomes the active one.
    pub fn add_page(&mut self, title: &str) -> Result<()> {
        if self.index_of(title).is_some() {
            return Err(LayoutError::DuplicatePage(title.to_string()));
        }
        self.pages.push(Page::new(
            title,
            self.config.seal_policy,
            self.config.logger.clone(),
        ));
        if self.active.is_none() {
            self.active = Some(self.pages.len() - 1);
        }
        emit(
            self.config.logger.as_ref(),
            LogLevel::Info,
            TARGET,
            "page_added",
            [json_str("page", title)],
        );
        Ok(())
    }

    pub fn page(&self, title: &str) -> Option<&Page> {
        self.index_of(title).map(|index| &self.pages[index])
    }

    pub fn page_mut(&mut self, title: &str) -> Option<&mut Page> {
        self.index_of(title).map(move |index| &mut self.pages[index])
    }

    pub fn page_titles(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(Page::title)
    }

    pub fn set_active(&mut self, title: &str) -> Result<()> {
        let index = self
            .index_of(title)
            .ok_or_else(|| LayoutError::NotFound(title.to_string()))?;
        self.active = Some(index);
        emit(
            self.config.logger.as_ref(),
            LogLevel::Info,
            TARGET,
            "page_activated",
            [json_str("page", title)],
        );
        Ok(())
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.active.map(|index| &self.pages[index])
    }

    /// Builder for the page titled `title`.
    pub fn loader(&mut self, title: &str) -> Result<FeatureLoader<'_>> {
        let index = self
            .index_of(title)
            .ok_or_else(|| LayoutError::NotFound(title.to_string()))?;
        Ok(FeatureLoader::new(
            &mut self.pages[index],
            &mut self.codes,
            &mut self.metrics,
            self.config.logger.as_ref(),
        ))
    }

    /// Capture pending input from `renderer`, then draw the active page into `area`.
    ///
    /// Returns the number of elements drawn; zero when no page exists.
    pub fn draw(
        &mut self,
        area: Rect,
        renderer: &mut dyn Renderer,
        properties: &dyn PropertyStore,
    ) -> usize {
        let Some(index) = self.active else {
            return 0;
        };
        let page = &mut self.pages[index];
        let captured = page.grid_mut().capture_inputs(&*renderer);

        let ctx = DrawContext {
            unit: self.config.row_unit,
            properties,
        };
        let drawn = page.grid().draw(area, &ctx, renderer);
        self.metrics.record_draw(drawn);
        emit(
            self.config.logger.as_ref(),
            LogLevel::Debug,
            TARGET,
            "page_drawn",
            [
                json_str("page", page.title()),
                json_kv("elements", json!(drawn)),
                json_kv("captured_inputs", json!(captured)),
                json_kv("width", json!(area.width)),
                json_kv("height", json!(area.height)),
            ],
        );
        drawn
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.metrics.snapshot()
    }

    /// Log the current counters as one `layout_metrics` event.
    pub fn emit_metrics(&self) {
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(self.metrics.snapshot().to_log_event(TARGET));
        }
    }

    fn index_of(&self, title: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.title() == title)
    }
}
