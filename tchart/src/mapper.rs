/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Loading charts from the contest JSON format.
//!
//! Each chart is an object like this:
//!
//! ```
//! # use tchart::{mapper, AndroidColorParser, LineType};
//! let json = r##"{
//!     "columns": [["x", 1542412800000, 1542499200000], ["y0", 37, 20]],
//!     "types": {"x": "x", "y0": "line"},
//!     "names": {"y0": "#0"},
//!     "colors": {"y0": "#3DC23F"}
//! }"##;
//! let chart = mapper::load_chart(json, &AndroidColorParser)?;
//! assert_eq!(chart.points_count(), 2);
//! assert_eq!(chart.line_type(), LineType::Line);
//! assert_eq!(chart.lines()[0].name, "#0");
//! # Ok::<(), tchart::ChartError>(())
//! ```
//!
//! The bundled app assets keep one chart per `contest/<n>/overview.json`, while
//! older data files hold a JSON array of charts.

use std::io;

use camino::Utf8PathBuf;
use fs_err as fs;
use serde_json::{Map, Value};

use crate::{ChartError, ChartFlags, ChartInputData, ChartLine, ColorParser, LineType, Result};

const CONTEST_DIR: &str = "contest";
const OVERVIEW_FILE: &str = "overview.json";
const X_TYPE: &str = "x";

/// Where chart resources come from (app assets, a directory on disk, ...).
pub trait ResourceLoader {
    /// Names of the entries directly under `path`.
    fn list_resources(&self, path: &str) -> io::Result<Vec<String>>;

    /// Full contents of the resource at `name`, decoded as UTF-8.
    fn read_resource(&self, name: &str) -> io::Result<String>;
}

/// A [`ResourceLoader`] rooted at a directory on disk, e.g. the app's `assets`.
#[derive(Debug, Clone)]
pub struct DirResourceLoader {
    root: Utf8PathBuf,
}

impl DirResourceLoader {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceLoader for DirResourceLoader {
    fn list_resources(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root.join(path))? {
            let entry = entry?;
            let name = entry.file_name().into_string().map_err(|name| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("non-utf8 resource name {:?}", name),
                )
            })?;
            names.push(name);
        }
        Ok(names)
    }

    fn read_resource(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(name))
    }
}

/// Load every `contest/<entry>/overview.json` the loader knows about, in name order.
pub fn load_resources(
    loader: &dyn ResourceLoader,
    color_parser: &dyn ColorParser,
) -> Result<Vec<ChartInputData>> {
    let mut entries = loader.list_resources(CONTEST_DIR)?;
    entries.sort();

    entries
        .iter()
        .map(|entry| {
            let name = format!("{CONTEST_DIR}/{entry}/{OVERVIEW_FILE}");
            log::debug!("loading chart from {name}");
            let json = loader.read_resource(&name)?;
            load_chart(&json, color_parser)
        })
        .collect()
}

/// Load a JSON array of charts.
pub fn load(json: &str, color_parser: &dyn ColorParser) -> Result<Vec<ChartInputData>> {
    let value: Value = serde_json::from_str(json)?;
    let charts = value
        .as_array()
        .ok_or_else(|| ChartError::format("expected an array of charts"))?;

    charts
        .iter()
        .enumerate()
        .map(|(i, chart)| {
            let obj = chart
                .as_object()
                .ok_or_else(|| ChartError::format(format!("chart #{i} is not an object")))?;
            parse_chart(obj, color_parser)
        })
        .collect()
}

/// Load a single chart object.
pub fn load_chart(json: &str, color_parser: &dyn ColorParser) -> Result<ChartInputData> {
    let value: Value = serde_json::from_str(json)?;
    let obj = value
        .as_object()
        .ok_or_else(|| ChartError::format("expected a chart object"))?;
    parse_chart(obj, color_parser)
}

fn parse_chart(jo: &Map<String, Value>, color_parser: &dyn ColorParser) -> Result<ChartInputData> {
    let columns = get_array(jo, "columns")?;
    let types = get_object(jo, "types")?;
    let names = get_object(jo, "names")?;
    let colors = get_object(jo, "colors")?;

    if columns.len() <= 1 {
        return Err(ChartError::format("not enough lines (2 or more req.)"));
    }

    let points_count = detect_points_count(columns)?;
    let lines_type = detect_lines_type(types)?;
    let flags = parse_flags(jo)?;

    let mut x_values = None;
    let mut lines = Vec::with_capacity(columns.len() - 1);

    for (j, column) in columns.iter().enumerate() {
        let column = column
            .as_array()
            .ok_or_else(|| ChartError::format(format!("column #{j} is not an array")))?;
        let line_id = column
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| ChartError::format(format!("column #{j} has no id")))?;
        let line_type = get_str(types, line_id, "types")?;

        if column.len() <= points_count {
            return Err(ChartError::format(format!(
                "column `{}` has fewer than {} values",
                line_id, points_count
            )));
        }
        let values = &column[1..=points_count];

        if line_type == X_TYPE {
            if x_values.is_some() {
                return Err(ChartError::format("duplicate x-type line"));
            }
            x_values = Some(
                values
                    .iter()
                    .map(|v| {
                        v.as_i64().ok_or_else(|| {
                            ChartError::format(format!("bad x value {v} in `{line_id}`"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            );
        } else {
            let found: LineType = line_type.parse()?;
            if found != lines_type {
                log::warn!("unsupported line type {found} in `{line_id}`");
                return Err(ChartError::MixedLineTypes {
                    expected: lines_type,
                    found,
                });
            }

            let values = values
                .iter()
                .map(|v| {
                    v.as_i64()
                        .and_then(|v| i32::try_from(v).ok())
                        .ok_or_else(|| {
                            ChartError::format(format!("bad y value {v} in `{line_id}`"))
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            let name = get_str(names, line_id, "names")?.to_owned();
            let color = color_parser.parse_color(get_str(colors, line_id, "colors")?)?;

            lines.push(ChartLine {
                name,
                color,
                values,
            });
        }
    }

    let x_values = x_values.ok_or_else(|| ChartError::format("no x-type line"))?;
    if lines.is_empty() {
        return Err(ChartError::format("no line-type lines"));
    }

    ChartInputData::new(x_values, lines, lines_type, flags)
}

// The first column sets the number of points, without its id at [0].
fn detect_points_count(columns: &[Value]) -> Result<usize> {
    let first = columns[0]
        .as_array()
        .ok_or_else(|| ChartError::format("column #0 is not an array"))?;
    match first.len() {
        0 | 1 => Err(ChartError::Empty("at least one point")),
        n => Ok(n - 1),
    }
}

fn detect_lines_type(types: &Map<String, Value>) -> Result<LineType> {
    for (line_id, line_type) in types {
        let line_type = line_type
            .as_str()
            .ok_or_else(|| ChartError::format(format!("type of `{line_id}` is not a string")))?;
        if line_type != X_TYPE {
            return line_type.parse();
        }
    }
    Ok(LineType::Line)
}

fn parse_flags(jo: &Map<String, Value>) -> Result<ChartFlags> {
    let mut flags = ChartFlags::empty();
    for (key, flag) in [
        ("percentage", ChartFlags::PERCENTAGE),
        ("stacked", ChartFlags::STACKED),
        ("y_scaled", ChartFlags::Y_SCALED),
    ] {
        match jo.get(key) {
            None => {}
            Some(Value::Bool(set)) => flags.set(flag, *set),
            Some(_) => return Err(ChartError::format(format!("`{key}` must be a boolean"))),
        }
    }
    Ok(flags)
}

fn get_array<'a>(jo: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
    jo.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ChartError::format(format!("missing array `{key}`")))
}

fn get_object<'a>(jo: &'a Map<String, Value>, key: &str) -> Result<&'a Map<String, Value>> {
    jo.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| ChartError::format(format!("missing object `{key}`")))
}

fn get_str<'a>(jo: &'a Map<String, Value>, key: &str, table: &str) -> Result<&'a str> {
    jo.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ChartError::format(format!("no `{table}` entry for `{key}`")))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    const FAKE_COLOR: i32 = 0;

    fn fake_colors(_: &str) -> Result<i32> {
        Ok(FAKE_COLOR)
    }

    fn chart_json() -> Value {
        json!({
            "columns": [
                ["x", 1, 2, 3],
                ["y0", 10, 20, 30],
                ["y1", -1, -2, -3]
            ],
            "types": {"x": "x", "y0": "line", "y1": "line"},
            "names": {"y0": "#0", "y1": "#1"},
            "colors": {"y0": "#3DC23F", "y1": "#F34C44"}
        })
    }

    fn load_value(v: &Value) -> Result<ChartInputData> {
        load_chart(&v.to_string(), &fake_colors)
    }

    #[test]
    fn test_load_chart() {
        let c = load_chart(&chart_json().to_string(), &crate::AndroidColorParser).unwrap();
        assert_eq!(c.x_values(), &[1, 2, 3]);
        assert_eq!(c.lines_count(), 2);
        assert_eq!(c.lines()[0].values, vec![10, 20, 30]);
        assert_eq!(c.lines()[1].values, vec![-1, -2, -3]);
        assert_eq!(c.lines()[1].name, "#1");
        assert_eq!(c.lines()[0].color as u32, 0xFF3DC23F);
        assert_eq!(c.line_type(), LineType::Line);
        assert!(c.flags().is_empty());
    }

    #[test]
    fn test_x_column_anywhere() {
        let mut v = chart_json();
        v["columns"] = json!([["y0", 10, 20], ["x", 1, 2], ["y1", 5, 6]]);
        let c = load_value(&v).unwrap();
        assert_eq!(c.x_values(), &[1, 2]);
        assert_eq!(c.lines()[0].name, "#0");
        assert_eq!(c.lines()[1].values, vec![5, 6]);
    }

    #[test]
    fn test_flags() {
        let mut v = chart_json();
        v["percentage"] = json!(true);
        v["stacked"] = json!(true);
        v["y_scaled"] = json!(false);
        let c = load_value(&v).unwrap();
        assert_eq!(c.flags(), ChartFlags::PERCENTAGE | ChartFlags::STACKED);

        v["y_scaled"] = json!("yes");
        assert!(matches!(load_value(&v), Err(ChartError::Format(_))));
    }

    #[test]
    fn test_extra_values_are_ignored() {
        let mut v = chart_json();
        v["columns"][1] = json!(["y0", 10, 20, 30, 40, 50]);
        let c = load_value(&v).unwrap();
        assert_eq!(c.lines()[0].values, vec![10, 20, 30]);
    }

    #[test]
    fn test_format_errors() {
        let cases: HashMap<&str, Value> = HashMap::from([
            ("not enough lines (2 or more req.)", json!([["x", 1]])),
            ("duplicate x-type line", json!([["x", 1], ["x", 2], ["y0", 3]])),
            ("no x-type line", json!([["y0", 1], ["y1", 2]])),
        ]);
        for (msg, columns) in cases {
            let mut v = chart_json();
            v["columns"] = columns;
            match load_value(&v) {
                Err(ChartError::Format(m)) => assert_eq!(m, msg),
                other => panic!("expected `{}`, got {:?}", msg, other),
            }
        }
    }

    #[test]
    fn test_no_points() {
        let mut v = chart_json();
        v["columns"] = json!([["x"], ["y0"]]);
        assert!(matches!(load_value(&v), Err(ChartError::Empty(_))));
    }

    #[test]
    fn test_mixed_line_types() {
        let mut v = chart_json();
        v["types"]["y1"] = json!("bar");
        assert!(matches!(
            load_value(&v),
            Err(ChartError::MixedLineTypes {
                expected: LineType::Line,
                found: LineType::Bar
            })
        ));
    }

    #[test]
    fn test_unknown_line_type() {
        let mut v = chart_json();
        v["types"]["y0"] = json!("pie");
        v["types"]["y1"] = json!("pie");
        assert!(matches!(load_value(&v), Err(ChartError::UnknownLineType(t)) if t == "pie"));
    }

    #[test]
    fn test_missing_tables_and_entries() {
        for key in ["columns", "types", "names", "colors"] {
            let mut v = chart_json();
            v.as_object_mut().unwrap().remove(key);
            assert!(matches!(load_value(&v), Err(ChartError::Format(_))), "{key}");
        }

        let mut v = chart_json();
        v["names"].as_object_mut().unwrap().remove("y1");
        assert!(matches!(load_value(&v), Err(ChartError::Format(_))));

        let mut v = chart_json();
        v["types"].as_object_mut().unwrap().remove("y1");
        assert!(matches!(load_value(&v), Err(ChartError::Format(_))));
    }

    #[test]
    fn test_bad_values() {
        let mut v = chart_json();
        v["columns"][1] = json!(["y0", 10, 4294967296i64, 30]);
        assert!(matches!(load_value(&v), Err(ChartError::Format(_))));

        let mut v = chart_json();
        v["columns"][0] = json!(["x", 1, "two", 3]);
        assert!(matches!(load_value(&v), Err(ChartError::Format(_))));

        let mut v = chart_json();
        v["columns"][2] = json!(["y1", 1]);
        assert!(matches!(load_value(&v), Err(ChartError::Format(_))));
    }

    #[test]
    fn test_color_errors_propagate() {
        let mut v = chart_json();
        v["colors"]["y0"] = json!("octarine");
        assert!(matches!(
            load_chart(&v.to_string(), &crate::AndroidColorParser),
            Err(ChartError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_load_array() {
        let json = json!([chart_json(), chart_json()]).to_string();
        assert_eq!(load(&json, &fake_colors).unwrap().len(), 2);

        assert!(matches!(
            load(&chart_json().to_string(), &fake_colors),
            Err(ChartError::Format(_))
        ));
        assert!(matches!(load("[1]", &fake_colors), Err(ChartError::Format(_))));
        assert!(matches!(load("[", &fake_colors), Err(ChartError::Json(_))));
        assert!(load("[]", &fake_colors).unwrap().is_empty());
    }

    struct MemLoader(HashMap<String, String>);

    impl ResourceLoader for MemLoader {
        fn list_resources(&self, path: &str) -> io::Result<Vec<String>> {
            assert_eq!(path, "contest");
            Ok(vec!["2".into(), "1".into()])
        }

        fn read_resource(&self, name: &str) -> io::Result<String> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_owned()))
        }
    }

    #[test]
    fn test_load_resources_in_name_order() {
        let mut second = chart_json();
        second["types"] = json!({"x": "x", "y0": "bar", "y1": "bar"});
        let loader = MemLoader(HashMap::from([
            ("contest/1/overview.json".to_owned(), chart_json().to_string()),
            ("contest/2/overview.json".to_owned(), second.to_string()),
        ]));

        let charts = load_resources(&loader, &fake_colors).unwrap();
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].line_type(), LineType::Line);
        assert_eq!(charts[1].line_type(), LineType::Bar);
    }

    #[test]
    fn test_load_resources_missing_file() {
        let loader = MemLoader(HashMap::new());
        assert!(matches!(
            load_resources(&loader, &fake_colors),
            Err(ChartError::Io(_))
        ));
    }
}
