#[cfg(test)]
pub(crate) mod test {
    use serde_yaml::Value;

    use crate::{ArgumentSpec, ConfigBlock, ConfigList, ConfigValue, Domain};

    pub fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).expect("fixture yaml")
    }

    /// The scenario block used both as a declared entry and as the
    /// `scenarios` list template.
    fn scenario_block() -> ConfigBlock {
        let mut sc = ConfigBlock::builder()
            .description("Single scenario block")
            .implicit_domain(Domain::Str)
            .build();
        sc.declare(
            "scenario file",
            ConfigValue::builder()
                .default("Net3.tsg")
                .domain(Domain::Str)
                .description("Scenario generation file, see the TEVASIM documentation")
                .doc(
                    "This is the (long) documentation for the 'scenario file'\n            parameter.  It contains multiple lines, and some internal\n            formatting; like a bulleted list:\n              - item 1\n              - item 2\n            ",
                )
                .build()
                .unwrap(),
        )
        .unwrap()
        .declare_as_argument(ArgumentSpec::new().group("Scenario definition"))
        .unwrap();
        sc.declare(
            "merlion",
            ConfigValue::builder()
                .default(false)
                .domain(Domain::Bool)
                .description("Water quality model")
                .doc(
                    "This is the (long) documentation for the 'merlion'\nparameter.  It contains multiple lines, but no apparent internal\nformatting; so the outputter should re-wrap everything.\n",
                )
                .build()
                .unwrap(),
        )
        .unwrap()
        .declare_as_argument(ArgumentSpec::new().group("Scenario definition"))
        .unwrap();
        sc.declare(
            "detection",
            ConfigValue::builder()
                .default(yaml("[1, 2, 3]"))
                .domain(Domain::list_of(Domain::Int))
                .description("Sensor placement list, epanetID")
                .build()
                .unwrap(),
        )
        .unwrap();
        sc
    }

    /// The flushing-model configuration tree the renderer and tracking
    /// tests are written against.
    pub fn flushing_config() -> ConfigBlock {
        let mut config = ConfigBlock::builder()
            .description("Basic configuration for Flushing models")
            .implicit()
            .build();

        let net = config
            .declare("network", ConfigBlock::new())
            .unwrap()
            .as_block_mut()
            .unwrap();
        net.declare(
            "epanet file",
            ConfigValue::builder()
                .default("Net3.inp")
                .domain(Domain::Str)
                .description("EPANET network inp file")
                .build()
                .unwrap(),
        )
        .unwrap()
        .declare_as_argument(ArgumentSpec::new().dest("epanet"))
        .unwrap();

        config.declare("scenario", scenario_block()).unwrap();

        config
            .declare(
                "scenarios",
                ConfigList::builder(scenario_block())
                    .description("List of scenario blocks")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        config
            .declare(
                "nodes",
                ConfigList::builder(
                    ConfigValue::builder()
                        .default(0)
                        .domain(Domain::Int)
                        .description("Node ID")
                        .build()
                        .unwrap(),
                )
                .description("List of node IDs")
                .build()
                .unwrap(),
            )
            .unwrap();

        let im = config
            .declare("impact", ConfigBlock::new())
            .unwrap()
            .as_block_mut()
            .unwrap();
        im.declare(
            "metric",
            ConfigValue::builder()
                .default("MC")
                .domain(Domain::Str)
                .description("Population or network based impact metric")
                .build()
                .unwrap(),
        )
        .unwrap();

        let fl = config
            .declare("flushing", ConfigBlock::new())
            .unwrap()
            .as_block_mut()
            .unwrap();
        let n = fl
            .declare("flush nodes", ConfigBlock::new())
            .unwrap()
            .as_block_mut()
            .unwrap();
        n.declare(
            "feasible nodes",
            ConfigValue::builder()
                .default("ALL")
                .domain(Domain::Str)
                .description("ALL, NZD, NONE, list or filename")
                .build()
                .unwrap(),
        )
        .unwrap();
        n.declare(
            "infeasible nodes",
            ConfigValue::builder()
                .default("NONE")
                .domain(Domain::Str)
                .description("ALL, NZD, NONE, list or filename")
                .build()
                .unwrap(),
        )
        .unwrap();
        n.declare(
            "max nodes",
            ConfigValue::builder()
                .default(2)
                .domain(Domain::Int)
                .description("Maximum number of nodes to flush")
                .build()
                .unwrap(),
        )
        .unwrap();
        n.declare(
            "rate",
            ConfigValue::builder()
                .default(600)
                .domain(Domain::Float)
                .description("Flushing rate [gallons/min]")
                .build()
                .unwrap(),
        )
        .unwrap();
        n.declare(
            "response time",
            ConfigValue::builder()
                .default(60)
                .domain(Domain::Float)
                .description("Time [min] between detection and flushing")
                .build()
                .unwrap(),
        )
        .unwrap();
        n.declare(
            "duration",
            ConfigValue::builder()
                .default(600)
                .domain(Domain::Float)
                .description("Time [min] for flushing")
                .build()
                .unwrap(),
        )
        .unwrap();

        let v = fl
            .declare("close valves", ConfigBlock::new())
            .unwrap()
            .as_block_mut()
            .unwrap();
        v.declare(
            "feasible pipes",
            ConfigValue::builder()
                .default("ALL")
                .domain(Domain::Str)
                .description("ALL, DIAM min max [inch], NONE, list or filename")
                .build()
                .unwrap(),
        )
        .unwrap();
        v.declare(
            "infeasible pipes",
            ConfigValue::builder()
                .default("NONE")
                .domain(Domain::Str)
                .description("ALL, DIAM min max [inch], NONE, list or filename")
                .build()
                .unwrap(),
        )
        .unwrap();
        v.declare(
            "max pipes",
            ConfigValue::builder()
                .default(2)
                .domain(Domain::Int)
                .description("Maximum number of pipes to close")
                .build()
                .unwrap(),
        )
        .unwrap();
        v.declare(
            "response time",
            ConfigValue::builder()
                .default(60)
                .domain(Domain::Float)
                .description("Time [min] between detection and closing valves")
                .build()
                .unwrap(),
        )
        .unwrap();

        config
    }

    /// The default value tree of [`flushing_config`].
    pub fn reference_value() -> Value {
        yaml(
            "\
network:
  epanet file: Net3.inp
scenario:
  scenario file: Net3.tsg
  merlion: false
  detection: [1, 2, 3]
scenarios: []
nodes: []
impact:
  metric: MC
flushing:
  flush nodes:
    feasible nodes: ALL
    infeasible nodes: NONE
    max nodes: 2
    rate: 600.0
    response time: 60.0
    duration: 600.0
  close valves:
    feasible pipes: ALL
    infeasible pipes: NONE
    max pipes: 2
    response time: 60.0
",
        )
    }

    #[test]
    fn fixture_builds_and_matches_reference() {
        let config = flushing_config();
        assert_eq!(config.value(), reference_value());
        assert_eq!(config.len(), 6);
    }
}
