//! FILENAME: report-engine/src/writer.rs
//! The control-break state machine: a single `handle(row)` call per input
//! row drives break detection, the footer cascade, the header band, detail
//! emission, and per-level accumulation. `handle(None)` signals end of
//! stream; the caller follows it with `process_grand_totals`.
//!
//! Grounded in the original system's `HandleDataRow`/`FindFirstChangedLevel`
//! /`ProcessFooters`/`ProcessHeaders`/`ProcessGrandTotals` split, adapted to
//! own its level stack directly rather than scanning a separately-owned
//! slice each call.

use rowtypes::{Cell, Row};

use crate::encode::{encode, OutputFormat};
use crate::error::WriterError;
use crate::event::{ReportRow, RowType};
use crate::level::ReportLevel;
use crate::sink::Sink;
use crate::spec::ReportSpec;

pub struct ReportWriter<S: Sink> {
    spec: ReportSpec,
    levels: Vec<ReportLevel>,
    format: OutputFormat,
    want_dashes: bool,
    suppress_details: bool,
    sink: S,
    first_row: bool,
    layout_width: usize,
}

impl<S: Sink> ReportWriter<S> {
    pub fn new(spec: ReportSpec, format: OutputFormat, sink: S, want_dashes: bool, suppress_details: bool) -> Self {
        let layout: Vec<_> = spec.column_layout().into_iter().cloned().collect();
        let layout_width = layout.len();
        let zero_row = || Row::new(layout.iter().map(|f| Cell::new(f.fld_type)).collect());

        let mut levels = vec![ReportLevel::new_grand_total(layout_width, zero_row())];
        for group_name in spec.groups.clone() {
            let fld_idx = spec.column_index(&group_name).map(|i| i as i32).unwrap_or(-1);
            levels.push(ReportLevel::new_group(group_name, fld_idx, zero_row()));
        }

        ReportWriter {
            spec,
            levels,
            format,
            want_dashes,
            suppress_details,
            sink,
            first_row: true,
            layout_width,
        }
    }

    pub fn grand_totals(&self) -> &ReportLevel {
        &self.levels[0]
    }

    fn emit(&mut self, row: ReportRow) -> Result<(), WriterError> {
        let bytes = encode(self.format, &row)?;
        self.sink.write(&bytes)
    }

    fn find_first_changed_level(&self, row: &Row) -> Option<usize> {
        (1..self.levels.len()).find(|&i| {
            let level = &self.levels[i];
            row.value_at_index(level.fld_idx) != level.prev_value
        })
    }

    fn emit_footers(&mut self, from_level: usize) -> Result<(), WriterError> {
        let width = self.layout_width;
        for i in (from_level..self.levels.len()).rev() {
            if self.levels[i].tot_count == 0 {
                continue;
            }
            if self.want_dashes {
                self.emit(ReportRow::dashes(RowType::Sum, i as i32, width))?;
            }
            let label = self.levels[i].display_label();
            let count = self.levels[i].tot_count;
            let values = self.levels[i].totals.to_strings();
            self.emit(ReportRow::new(RowType::Sum, i as i32, label, count, values))?;
            if self.want_dashes {
                self.emit(ReportRow::double_dashes(RowType::Sum, i as i32, width))?;
                self.emit(ReportRow::blank(RowType::Sum, i as i32))?;
            }
            self.levels[i].totals.reset_numerics();
            self.levels[i].tot_count = 0;
        }
        Ok(())
    }

    fn emit_header_band(&mut self, from_level: usize, row: &Row) -> Result<(), WriterError> {
        for i in from_level..self.levels.len() {
            self.levels[i].prev_value = row.value_at_index(self.levels[i].fld_idx);
            if !self.suppress_details {
                let label = self.levels[i].prev_value.clone();
                self.emit(ReportRow::new(RowType::Hdr, i as i32, label, 0, vec![]))?;
            }
        }
        if !self.suppress_details {
            let innermost = (self.levels.len() - 1) as i32;
            self.emit(ReportRow::new(RowType::Hdr, innermost, "", 0, self.spec.column_display_names()))?;
            if self.want_dashes {
                self.emit(ReportRow::dashes(RowType::Hdr, innermost, self.layout_width))?;
            }
        }
        Ok(())
    }

    fn emit_detail(&mut self, row: &Row) -> Result<(), WriterError> {
        let innermost = (self.levels.len() - 1) as i32;
        self.emit(ReportRow::new(RowType::Det, innermost, "", 0, row.to_strings()))
    }

    /// Processes one input row, or signals end of stream with `None`.
    pub fn handle(&mut self, row: Option<&Row>) -> Result<(), WriterError> {
        match row {
            Some(r) => {
                if self.first_row {
                    self.emit_header_band(1, r)?;
                    self.first_row = false;
                } else if let Some(changed) = self.find_first_changed_level(r) {
                    self.emit_footers(changed)?;
                    self.emit_header_band(changed, r)?;
                }
                if !self.suppress_details {
                    self.emit_detail(r)?;
                }
                for level in self.levels.iter_mut() {
                    if level.totals.accumulate(r) {
                        level.tot_count += 1;
                    }
                }
                Ok(())
            }
            None => self.emit_footers(1),
        }
    }

    /// Emits the grand-total footer. Called once, after the last
    /// `handle(None)`.
    pub fn process_grand_totals(&mut self) -> Result<(), WriterError> {
        let width = self.layout_width;
        if self.want_dashes {
            self.emit(ReportRow::dashes(RowType::Tot, 0, width))?;
        }
        let count = self.levels[0].tot_count;
        let values = self.levels[0].totals.to_strings();
        self.emit(ReportRow::new(RowType::Tot, 0, "Grand Totals", count, values))?;
        if self.want_dashes {
            self.emit(ReportRow::double_dashes(RowType::Tot, 0, width))?;
            self.emit(ReportRow::blank(RowType::Tot, 0))?;
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), WriterError> {
        self.sink.close()
    }
}
