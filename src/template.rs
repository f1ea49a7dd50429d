//! Commented template generation.
//!
//! Renders the tree as a YAML-flavored skeleton with every node's short
//! description as a right-aligned `#` comment. Comment columns are aligned
//! per indentation level and pulled together across levels where the width
//! allows, and descriptions wrap onto continuation lines that repeat the
//! column with a `#   ` marker. Output lines never exceed the configured
//! width; a width too small to fit any comment text is an error rather
//! than an overflow.

use crate::display::{element_leaf_label, leaf_label, list_label};
use crate::error::ConfigError;
use crate::node::{Node, NodeRef};
use crate::wrap::wrap;

/// Width floor reserved for comment text. A deeper level's comment column
/// only propagates to shallower levels while it leaves two of these within
/// the width, which keeps top-level comments from being dragged far right
/// in narrow output.
const MIN_DOC_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct TemplateOptions {
    /// Spaces per nesting level. Must be positive.
    pub indent_spacing: usize,
    /// Maximum output line width. Must be positive.
    pub width: usize,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            indent_spacing: 2,
            width: 80,
        }
    }
}

struct Line {
    level: usize,
    content: String,
    comment: Option<String>,
}

pub(crate) fn render(root: NodeRef, options: &TemplateOptions) -> Result<String, ConfigError> {
    if options.indent_spacing == 0 {
        return Err(ConfigError::InvalidIndent);
    }
    let width = options.width;
    if width < 3 {
        return Err(ConfigError::TemplateWidth { width, needed: 3 });
    }

    let mut out = String::new();
    let mut lines = Vec::new();
    match root {
        NodeRef::Value(leaf) => {
            lines.push(Line {
                level: 0,
                content: element_leaf_label(leaf),
                comment: leaf.info.description.clone(),
            });
        }
        NodeRef::Block(block) => {
            if let Some(desc) = &block.info.description {
                emit_heading_comment(desc, width, &mut out);
            }
            for (key, child) in block.entries.iter() {
                collect_named(key, child, 0, &mut lines);
            }
        }
        NodeRef::List(list) => {
            if let Some(desc) = &list.info.description {
                emit_heading_comment(desc, width, &mut out);
            }
            for element in &list.data {
                collect_element(element, 0, &mut lines);
            }
        }
    }

    let columns = comment_columns(&lines, options);
    for line in &lines {
        let mut text = " ".repeat(line.level * options.indent_spacing);
        text.push_str(&line.content);
        match &line.comment {
            None => {
                out.push_str(&text);
                out.push('\n');
            }
            Some(comment) => {
                let column = columns[line.level].max(text.chars().count() + 2);
                if width < column + 3 {
                    return Err(ConfigError::TemplateWidth {
                        width,
                        needed: column + 3,
                    });
                }
                let chunks = wrap(comment, width - column - 2, width - column - 4);
                if chunks.len() > 1 && width < column + 5 {
                    return Err(ConfigError::TemplateWidth {
                        width,
                        needed: column + 5,
                    });
                }
                for (i, chunk) in chunks.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&text);
                        for _ in text.chars().count()..column {
                            out.push(' ');
                        }
                        out.push_str("# ");
                    } else {
                        out.push_str(&" ".repeat(column));
                        out.push_str("#   ");
                    }
                    out.push_str(chunk);
                    out.push('\n');
                }
                if chunks.is_empty() {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
        }
    }
    Ok(out)
}

/// Full-width comment block for the root node's own description.
fn emit_heading_comment(desc: &str, width: usize, out: &mut String) {
    for (i, chunk) in wrap(desc, width.saturating_sub(2), width.saturating_sub(4))
        .iter()
        .enumerate()
    {
        out.push_str(if i == 0 { "# " } else { "#   " });
        out.push_str(chunk);
        out.push('\n');
    }
}

fn collect_named(key: &str, node: &Node, level: usize, lines: &mut Vec<Line>) {
    let comment = node.info().description.clone();
    match node {
        Node::Value(leaf) => lines.push(Line {
            level,
            content: leaf_label(key, leaf),
            comment,
        }),
        Node::Block(block) => {
            lines.push(Line {
                level,
                content: format!("{key}:"),
                comment,
            });
            for (child_key, child) in block.entries.iter() {
                collect_named(child_key, child, level + 1, lines);
            }
        }
        Node::List(list) => {
            lines.push(Line {
                level,
                content: list_label(key, list),
                comment,
            });
            for element in &list.data {
                collect_element(element, level + 1, lines);
            }
        }
    }
}

fn collect_element(node: &Node, level: usize, lines: &mut Vec<Line>) {
    let comment = node.info().description.clone();
    match node {
        Node::Value(leaf) => lines.push(Line {
            level,
            content: element_leaf_label(leaf),
            comment,
        }),
        Node::Block(block) => {
            lines.push(Line {
                level,
                content: "-".to_string(),
                comment,
            });
            for (child_key, child) in block.entries.iter() {
                collect_named(child_key, child, level + 1, lines);
            }
        }
        Node::List(list) => {
            lines.push(Line {
                level,
                content: if list.data.is_empty() { "- []" } else { "-" }.to_string(),
                comment,
            });
            for element in &list.data {
                collect_element(element, level + 1, lines);
            }
        }
    }
}

/// Comment column per indentation level.
///
/// Each level's own column sits two spaces past its longest content line.
/// Walking from the deepest level up, a deeper column is adopted by
/// shallower levels when it leaves room for two minimum-width comment
/// columns; otherwise the shallower levels keep their tighter alignment.
fn comment_columns(lines: &[Line], options: &TemplateOptions) -> Vec<usize> {
    let levels = lines.iter().map(|l| l.level + 1).max().unwrap_or(0);
    let mut columns = vec![0usize; levels];
    for line in lines {
        let content_len = line.level * options.indent_spacing + line.content.chars().count();
        columns[line.level] = columns[line.level].max(content_len + 2);
    }

    let propagation_limit = options
        .width
        .saturating_sub(4 + 2 * MIN_DOC_WIDTH);
    let mut adopted = 0usize;
    for level in (0..levels).rev() {
        let own = columns[level];
        columns[level] = own.max(adopted);
        if own <= propagation_limit {
            adopted = adopted.max(own);
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::flushing_config;

    fn validate(template: &str, options: &TemplateOptions) {
        for line in template.lines() {
            assert!(
                line.chars().count() <= options.width,
                "line exceeds width {}: {line:?}",
                options.width
            );
            if line.trim_start().starts_with('#') {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            assert_eq!(
                indent % options.indent_spacing,
                0,
                "indent {indent} is not a multiple of {}: {line:?}",
                options.indent_spacing
            );
        }
    }

    #[test]
    fn template_default_options() {
        let reference = "\
# Basic configuration for Flushing models
network:
  epanet file: Net3.inp     # EPANET network inp file
scenario:                   # Single scenario block
  scenario file: Net3.tsg   # Scenario generation file, see the TEVASIM
                            #   documentation
  merlion: false            # Water quality model
  detection: [1, 2, 3]      # Sensor placement list, epanetID
scenarios: []               # List of scenario blocks
nodes: []                   # List of node IDs
impact:
  metric: MC                # Population or network based impact metric
flushing:
  flush nodes:
    feasible nodes: ALL     # ALL, NZD, NONE, list or filename
    infeasible nodes: NONE  # ALL, NZD, NONE, list or filename
    max nodes: 2            # Maximum number of nodes to flush
    rate: 600.0             # Flushing rate [gallons/min]
    response time: 60.0     # Time [min] between detection and flushing
    duration: 600.0         # Time [min] for flushing
  close valves:
    feasible pipes: ALL     # ALL, DIAM min max [inch], NONE, list or filename
    infeasible pipes: NONE  # ALL, DIAM min max [inch], NONE, list or filename
    max pipes: 2            # Maximum number of pipes to close
    response time: 60.0     # Time [min] between detection and closing valves
";
        let options = TemplateOptions::default();
        let template = flushing_config().generate_yaml_template(&options).unwrap();
        validate(&template, &options);
        assert_eq!(template, reference);
    }

    #[test]
    fn template_three_space_indent() {
        let reference = "\
# Basic configuration for Flushing models
network:
   epanet file: Net3.inp      # EPANET network inp file
scenario:                     # Single scenario block
   scenario file: Net3.tsg    # Scenario generation file, see the TEVASIM
                              #   documentation
   merlion: false             # Water quality model
   detection: [1, 2, 3]       # Sensor placement list, epanetID
scenarios: []                 # List of scenario blocks
nodes: []                     # List of node IDs
impact:
   metric: MC                 # Population or network based impact metric
flushing:
   flush nodes:
      feasible nodes: ALL     # ALL, NZD, NONE, list or filename
      infeasible nodes: NONE  # ALL, NZD, NONE, list or filename
      max nodes: 2            # Maximum number of nodes to flush
      rate: 600.0             # Flushing rate [gallons/min]
      response time: 60.0     # Time [min] between detection and flushing
      duration: 600.0         # Time [min] for flushing
   close valves:
      feasible pipes: ALL     # ALL, DIAM min max [inch], NONE, list or
                              #   filename
      infeasible pipes: NONE  # ALL, DIAM min max [inch], NONE, list or
                              #   filename
      max pipes: 2            # Maximum number of pipes to close
      response time: 60.0     # Time [min] between detection and closing
                              #   valves
";
        let options = TemplateOptions {
            indent_spacing: 3,
            width: 78,
        };
        let template = flushing_config().generate_yaml_template(&options).unwrap();
        validate(&template, &options);
        assert_eq!(template, reference);
    }

    #[test]
    fn template_four_space_indent() {
        let reference = "\
# Basic configuration for Flushing models
network:
    epanet file: Net3.inp       # EPANET network inp file
scenario:                       # Single scenario block
    scenario file: Net3.tsg     # Scenario generation file, see the TEVASIM
                                #   documentation
    merlion: false              # Water quality model
    detection: [1, 2, 3]        # Sensor placement list, epanetID
scenarios: []                   # List of scenario blocks
nodes: []                       # List of node IDs
impact:
    metric: MC                  # Population or network based impact metric
flushing:
    flush nodes:
        feasible nodes: ALL     # ALL, NZD, NONE, list or filename
        infeasible nodes: NONE  # ALL, NZD, NONE, list or filename
        max nodes: 2            # Maximum number of nodes to flush
        rate: 600.0             # Flushing rate [gallons/min]
        response time: 60.0     # Time [min] between detection and flushing
        duration: 600.0         # Time [min] for flushing
    close valves:
        feasible pipes: ALL     # ALL, DIAM min max [inch], NONE, list or
                                #   filename
        infeasible pipes: NONE  # ALL, DIAM min max [inch], NONE, list or
                                #   filename
        max pipes: 2            # Maximum number of pipes to close
        response time: 60.0     # Time [min] between detection and closing
                                #   valves
";
        let options = TemplateOptions {
            indent_spacing: 4,
            width: 78,
        };
        let template = flushing_config().generate_yaml_template(&options).unwrap();
        validate(&template, &options);
        assert_eq!(template, reference);
    }

    #[test]
    fn template_narrow_width_splits_alignment() {
        let reference = "\
# Basic configuration for Flushing models
network:
   epanet file: Net3.inp    # EPANET network inp file
scenario:                   # Single scenario block
   scenario file: Net3.tsg  # Scenario generation file, see the TEVASIM
                            #   documentation
   merlion: false           # Water quality model
   detection: [1, 2, 3]     # Sensor placement list, epanetID
scenarios: []               # List of scenario blocks
nodes: []                   # List of node IDs
impact:
   metric: MC               # Population or network based impact metric
flushing:
   flush nodes:
      feasible nodes: ALL     # ALL, NZD, NONE, list or filename
      infeasible nodes: NONE  # ALL, NZD, NONE, list or filename
      max nodes: 2            # Maximum number of nodes to flush
      rate: 600.0             # Flushing rate [gallons/min]
      response time: 60.0     # Time [min] between detection and
                              #   flushing
      duration: 600.0         # Time [min] for flushing
   close valves:
      feasible pipes: ALL     # ALL, DIAM min max [inch], NONE, list or
                              #   filename
      infeasible pipes: NONE  # ALL, DIAM min max [inch], NONE, list or
                              #   filename
      max pipes: 2            # Maximum number of pipes to close
      response time: 60.0     # Time [min] between detection and closing
                              #   valves
";
        let options = TemplateOptions {
            indent_spacing: 3,
            width: 72,
        };
        let template = flushing_config().generate_yaml_template(&options).unwrap();
        validate(&template, &options);
        assert_eq!(template, reference);
    }

    #[test]
    fn narrower_width_wraps_fixture_comment() {
        let mut config = crate::ConfigBlock::new();
        let net = config
            .declare("network", crate::ConfigBlock::new())
            .unwrap()
            .as_block_mut()
            .unwrap();
        net.declare(
            "epanet file",
            crate::ConfigValue::builder()
                .default("Net3.inp")
                .domain(crate::Domain::Str)
                .description("EPANET network inp file")
                .build()
                .unwrap(),
        )
        .unwrap();

        let options = TemplateOptions {
            indent_spacing: 2,
            width: 40,
        };
        let template = config.generate_yaml_template(&options).unwrap();
        validate(&template, &options);
        assert!(template.contains("#   "), "expected a wrapped comment:\n{template}");
    }

    #[test]
    fn zero_indent_is_rejected() {
        let err = flushing_config()
            .generate_yaml_template(&TemplateOptions {
                indent_spacing: 0,
                width: 80,
            })
            .unwrap_err();
        assert!(matches!(err, crate::ConfigError::InvalidIndent));
    }

    #[test]
    fn impossible_width_errors_instead_of_overflowing() {
        let err = flushing_config()
            .generate_yaml_template(&TemplateOptions {
                indent_spacing: 2,
                width: 20,
            })
            .unwrap_err();
        assert!(matches!(err, crate::ConfigError::TemplateWidth { .. }));
    }

    #[test]
    fn populated_list_renders_elements() {
        let mut config = flushing_config();
        config.item_mut("nodes").unwrap().append(7).unwrap();
        let template = config
            .generate_yaml_template(&TemplateOptions::default())
            .unwrap();
        assert!(template.contains("nodes:"));
        assert!(template.contains("- 7"));
        assert!(!template.contains("nodes: []"));
    }
}
