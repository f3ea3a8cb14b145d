//! Integration tests for Ninja file generation from dependency graphs.

use mkninja::config::GenConfig;
use mkninja::error::GenError;
use mkninja::runner::generate;
use rstest::{fixture, rstest};
use test_support::{GraphBuilder, node};

#[fixture]
fn config() -> GenConfig {
    GenConfig {
        pool_depth: 8,
        ..GenConfig::default()
    }
}

fn build_file(graph: GraphBuilder, config: &GenConfig) -> String {
    generate(&graph.build(), config)
        .expect("generate artefacts")
        .build_file
}

fn build_lines(ninja: &str) -> Vec<&str> {
    ninja
        .lines()
        .filter_map(|line| line.strip_prefix("build "))
        .collect()
}

#[rstest]
fn compile_rule_expands_variables_and_finds_depfile(config: GenConfig) {
    let graph = GraphBuilder::new().var("CC", "gcc").with(
        node("obj/foo.o")
            .cmd("$(CC) -c $< -o $@ -MD")
            .deps(&["src/foo.c"]),
    );
    let expected = concat!(
        "# Generated by mkninja\n\n",
        "rule rule0\n",
        " description = build $out\n",
        " depfile = obj/foo.d\n",
        " command = gcc -c src/foo.c -o obj/foo.o -MD\n",
        "build obj/foo.o: rule0 src/foo.c\n",
    );
    assert_eq!(build_file(graph, &config), expected);
}

#[rstest]
fn explicit_depfile_flag_wins(config: GenConfig) {
    let graph = GraphBuilder::new().with(
        node("foo.o").cmd("gcc -c foo.c -o foo.o -MD -MF deps/foo.dep"),
    );
    assert!(build_file(graph, &config).contains(" depfile = deps/foo.dep\n"));
}

#[rstest]
fn tolerant_recipe_lines_are_joined_with_semicolons(config: GenConfig) {
    let graph = GraphBuilder::new().with(
        node("stamp")
            .cmd("-rm -f $@")
            .cmd("@touch $@"),
    );
    assert!(
        build_file(graph, &config).contains(" command = (rm -f stamp) ; (touch stamp)\n")
    );
}

#[rstest]
fn escaped_dollars_survive_into_the_command(config: GenConfig) {
    let graph = GraphBuilder::new().with(node("home.txt").cmd("echo $$HOME > $@"));
    assert!(build_file(graph, &config).contains(" command = echo $$HOME > home.txt\n"));
}

#[rstest]
fn order_only_prerequisites_follow_the_double_bar(config: GenConfig) {
    let graph = GraphBuilder::new()
        .with(
            node("out/app")
                .cmd("cp gen/app $@")
                .deps(&["gen/app"])
                .order_only(&["out"]),
        )
        .with(node("gen/app").cmd("touch $@"))
        .with(node("out").cmd("mkdir -p $@"))
        .root("out/app");
    let ninja = build_file(graph, &config);
    assert_eq!(
        build_lines(&ninja),
        vec!["out/app: rule0 gen/app || out", "gen/app: rule1", "out: rule2"]
    );
}

#[rstest]
fn unreachable_nodes_are_left_out(config: GenConfig) {
    let graph = GraphBuilder::new()
        .with(node("all").phony().deps(&["a"]))
        .with(node("a").cmd("touch $@"))
        .with(node("orphan").cmd("touch $@"))
        .root("all");
    let ninja = build_file(graph, &config);
    assert_eq!(build_lines(&ninja), vec!["all: phony a", "a: rule0"]);
}

#[rstest]
fn cycles_are_rejected(config: GenConfig) {
    let graph = GraphBuilder::new()
        .with(node("b").cmd("touch $@").deps(&["a"]))
        .with(node("a").cmd("touch $@").deps(&["b"]))
        .build();
    let err = generate(&graph, &config).expect_err("cycle");
    assert_eq!(
        err,
        GenError::CircularDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()]
        }
    );
}

#[rstest]
fn ambiguous_depfile_fails_generation(config: GenConfig) {
    let graph = GraphBuilder::new()
        .with(node("x.o").cmd("gcc -c x.c -o x.o -MD -MF a.d -MF b.d"))
        .build();
    let err = generate(&graph, &config).expect_err("ambiguous depfile");
    assert!(matches!(err, GenError::MultipleDepfileCandidates { .. }));
}

#[rstest]
fn accelerated_compiles_skip_the_local_pool(config: GenConfig) {
    let accelerated = config.with_accel_dir("/opt/goma");
    let graph = GraphBuilder::new()
        .with(node("lib.a").cmd("ar rcs $@ $^").deps(&["a.o"]))
        .with(node("a.o").cmd("prebuilts/gcc/bin/g++ -O2 -c a.cc -o $@"))
        .root("lib.a");
    let ninja = build_file(graph, &accelerated);
    assert!(ninja.contains("pool local_pool\n depth = 8\n"));
    assert!(ninja.contains("build lib.a: rule0 a.o\n pool = local_pool\n"));
    assert!(ninja.contains(" command = /opt/goma/gomacc prebuilts/gcc/bin/g++ -O2 -c a.cc -o a.o\n"));
    assert!(ninja.ends_with("build a.o: rule1\n"));
}
