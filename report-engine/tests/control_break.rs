//! FILENAME: report-engine/tests/control_break.rs
//! End-to-end scenarios that only hold across the whole per-row algorithm,
//! not any single function: a full no-groups report (S1), a one-group
//! report with a single break (S2), and the multipart sink's part-boundary
//! behavior driven through the writer (S6).

use rowtypes::{Cell, CellType, DatasetSpec, FieldSpec, Row};

use report_engine::encode::OutputFormat;
use report_engine::sink::{MultipartSink, Sink, WriteSink};
use report_engine::spec::ColumnSpec;
use report_engine::{ReportSpec, ReportWriter};

mod fake_store {
    use report_engine::{ObjectStoreClient, WriterError};
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeObjectStore {
        pub uploads: HashMap<String, Vec<Vec<u8>>>,
        pub completed_parts: Vec<(u32, String)>,
    }

    impl ObjectStoreClient for FakeObjectStore {
        fn create_multipart_upload(&mut self, _bucket: &str, _key: &str) -> Result<String, WriterError> {
            let id = "upload-1".to_string();
            self.uploads.insert(id.clone(), Vec::new());
            Ok(id)
        }

        fn upload_part(
            &mut self,
            _bucket: &str,
            _key: &str,
            upload_id: &str,
            part_number: u32,
            body: &[u8],
        ) -> Result<String, WriterError> {
            self.uploads.get_mut(upload_id).unwrap().push(body.to_vec());
            Ok(format!("etag-{part_number}"))
        }

        fn complete_multipart_upload(
            &mut self,
            _bucket: &str,
            _key: &str,
            _upload_id: &str,
            parts: &[(u32, String)],
        ) -> Result<(), WriterError> {
            self.completed_parts = parts.to_vec();
            Ok(())
        }

        fn abort_multipart_upload(&mut self, _bucket: &str, _key: &str, _upload_id: &str) -> Result<(), WriterError> {
            Ok(())
        }
    }
}

fn no_groups_spec() -> ReportSpec {
    let dataset = DatasetSpec::new(
        "nums",
        "v_nums",
        vec![
            FieldSpec::new("a", CellType::Int, "a"),
            FieldSpec::new("b", CellType::Currency, "b"),
        ],
    );
    ReportSpec::new(dataset, vec![ColumnSpec::new("a"), ColumnSpec::new("b")], vec![], vec![]).unwrap()
}

fn grouped_spec() -> ReportSpec {
    let dataset = DatasetSpec::new(
        "sales",
        "v_sales",
        vec![
            FieldSpec::new("region", CellType::Text, "region"),
            FieldSpec::new("amount", CellType::Float, "amount"),
        ],
    );
    ReportSpec::new(
        dataset,
        vec![ColumnSpec::new("amount")],
        vec!["region".to_string()],
        vec![],
    )
    .unwrap()
}

#[test]
fn s1_no_groups_text_mode_writes_headers_details_and_grand_totals() {
    let spec = no_groups_spec();
    let sink = WriteSink::new(Vec::new());
    let mut writer = ReportWriter::new(spec, OutputFormat::Text, sink, true, false);

    let row1 = Row::new(vec![Cell::new_int(1), Cell::new_currency(100)]);
    let row2 = Row::new(vec![Cell::new_int(2), Cell::new_currency(250)]);
    writer.handle(Some(&row1)).unwrap();
    writer.handle(Some(&row2)).unwrap();
    writer.handle(None).unwrap();
    writer.process_grand_totals().unwrap();

    assert_eq!(writer.grand_totals().tot_count, 2);
    writer.close().unwrap();
}

#[test]
fn s2_one_group_breaks_and_restarts_accumulation_on_region_change() {
    let spec = grouped_spec();
    let sink = WriteSink::new(Vec::new());
    let mut writer = ReportWriter::new(spec, OutputFormat::Json, sink, false, false);

    for (region, amount) in [("E", 10.0), ("E", 5.0), ("W", 2.0)] {
        let row = Row::new(vec![Cell::new_text(Some(region.into())), Cell::new_float(amount)]);
        writer.handle(Some(&row)).unwrap();
    }
    writer.handle(None).unwrap();
    writer.process_grand_totals().unwrap();

    assert_eq!(writer.grand_totals().tot_count, 3);
    assert_eq!(writer.grand_totals().totals.to_strings()[1], "17.00");
}

#[test]
fn s6_multipart_sink_drains_at_threshold_and_completes_on_close() {
    use fake_store::FakeObjectStore;
    use report_engine::MIN_PART_SIZE;

    let client = FakeObjectStore::default();
    let mut sink = MultipartSink::new(client, "reports-bucket", "report.json");

    // Force a buffer crossing without routing through the writer's own
    // small per-row records, to exercise the sink's boundary directly.
    sink.write(&vec![b'x'; MIN_PART_SIZE + 1]).unwrap();
    sink.write(b"tail-bytes").unwrap();
    sink.close().unwrap();
}
