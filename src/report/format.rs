use crate::search::Pass;

/// Degrees as `d:mm:ss.s`, rounded to a tenth of an arcsecond.
pub fn sexagesimal(deg: f64) -> String {
    let sign = if deg < 0.0 { "-" } else { "" };
    let tenths = (deg.abs() * 36_000.0).round() as u64;
    let degrees = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let seconds = tenths % 600;
    format!(
        "{}{}:{:02}:{:02}.{}",
        sign,
        degrees,
        minutes,
        seconds / 10,
        seconds % 10
    )
}

fn quote(field: &str) -> String {
    field.replace('\\', "\\\\").replace('\'', "\\'")
}

impl Pass {
    /// One flat, quoted, comma separated record.
    pub fn csv_record(&self) -> String {
        format!(
            "'{}','{}','{}','{}','{}','{}(+N)','{}(+E)','{:.1}[Km]','{:.1}[deg]','{:.1}[deg]','{:.1}[Km]','{:.1}[deg]'",
            quote(&self.satellite),
            quote(&self.aoi),
            self.orbit,
            self.date_str(),
            self.time_str(),
            sexagesimal(self.sub_latitude_deg),
            sexagesimal(self.sub_longitude_deg),
            self.altitude_km,
            self.azimuth_deg,
            self.elevation_deg,
            self.range_km,
            self.off_nadir_deg
        )
    }
}

/// Records wrapped as array literals, one per line, ready for substitution.
pub fn report_rows(passes: &[Pass]) -> String {
    passes
        .iter()
        .map(|p| format!("[{}]", p.csv_record()))
        .collect::<Vec<_>>()
        .join(",\n")
}
