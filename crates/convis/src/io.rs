//! CSV export of activity traces.
use std::path::Path;

use ndarray::ArrayView1;

use crate::error::{ConvisError, Result};

/// Write named traces as columns next to a `time` column in seconds.
///
/// All traces must share the same length.
pub fn write_traces_csv<P: AsRef<Path>>(
    path: P,
    frame_duration: f32,
    traces: &[(&str, ArrayView1<f32>)],
) -> Result<()> {
    let n = traces.first().map(|(_, t)| t.len()).unwrap_or(0);
    if let Some((name, bad)) = traces.iter().find(|(_, t)| t.len() != n) {
        return Err(ConvisError::ShapeMismatch(
            format!("{} samples", n),
            format!("{} samples in '{}'", bad.len(), name),
        ));
    }

    let mut writer = csv::Writer::from_path(&path)?;
    let mut header = vec!["time".to_string()];
    header.extend(traces.iter().map(|(name, _)| name.to_string()));
    writer.write_record(&header)?;

    for i in 0..n {
        let mut record = Vec::with_capacity(traces.len() + 1);
        record.push(format!("{:.6}", i as f32 * frame_duration));
        record.extend(traces.iter().map(|(_, t)| t[i].to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    log::info!("Wrote {} rows to {}", n, path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.csv");
        let on = Array1::from_vec(vec![0.5f32, 1.0, 0.0]);
        let off = Array1::from_vec(vec![0.0f32, 0.25, 0.75]);
        write_traces_csv(&path, 0.001, &[("on", on.view()), ("off", off.view())]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(headers, vec!["time", "on", "off"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[1][0], "0.001000");
        assert_eq!(&rows[2][2], "0.75");
    }

    #[test]
    fn rejects_ragged_traces() {
        let dir = tempfile::tempdir().unwrap();
        let a = Array1::<f32>::zeros(3);
        let b = Array1::<f32>::zeros(4);
        let res = write_traces_csv(
            dir.path().join("bad.csv"),
            0.001,
            &[("a", a.view()), ("b", b.view())],
        );
        assert!(matches!(res, Err(ConvisError::ShapeMismatch(_, _))));
    }
}
