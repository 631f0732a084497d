use criterion::criterion_group;
use criterion::criterion_main;
use criterion::measurement::WallTime;
use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use itertools::Itertools;

use acmatch::{AhoCorasick, MatchKind};

const WORDS: &[&str] = &[
    "Hogwarts", "magical", "world", "Harry", "Potter", "wizard", "journey", "School",
    "Witchcraft", "Wizardry", "Ron", "Weasley", "Hermione", "Granger", "adventures",
    "challenges", "creatures", "Quidditch", "mysteries", "Stone", "friends", "courage",
    "Voldemort", "dark", "parents", "spells", "broomstick", "enchanted", "sorting", "hat",
    "potion", "Snape", "Professor", "Dumbledore", "spell", "Hagrid", "ghosts", "chamber",
    "secrets", "Phoenix", "keys", "chess", "mirror", "castle", "elf", "goblin", "wand",
    "wizards", "witches", "cauldron", "Diagon", "Alley", "Gringotts", "treasure",
];

/// A deterministic haystack built from the pattern words and filler.
fn haystack(len: usize) -> String {
    let filler = ["the", "and", "of", "to", "a", "in", "was", "he", "said"];
    let mut text = String::with_capacity(len + 16);
    let mut i = 0usize;
    while text.len() < len {
        let word = if i % 5 == 0 {
            WORDS[(i * 7) % WORDS.len()]
        } else {
            filler[(i * 3) % filler.len()]
        };
        text.push_str(word);
        text.push(' ');
        i += 1;
    }
    text
}

/// Count occurrences with one substring scan per pattern.
fn naive_count(patterns: &[&str], text: &str) -> usize {
    patterns.iter().map(|p| text.matches(p).count()).sum()
}

fn bench_matching(group: &mut BenchmarkGroup<WallTime>, text: &str, sizes: &[usize]) {
    group.sample_size(10);
    for &n in sizes {
        let patterns = WORDS[..n].to_vec();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("naive", n), &n, |b, _| {
            b.iter(|| criterion::black_box(naive_count(&patterns, text)));
        });
        for kind in [MatchKind::Standard, MatchKind::LeftmostFirst] {
            let matcher = AhoCorasick::with_match_kind(patterns.clone(), kind);
            group.bench_with_input(BenchmarkId::new(format!("aho-corasick/{kind}"), n), &n, |b, _| {
                b.iter(|| criterion::black_box(matcher.find_iter(text).count()));
            });
        }
    }
}

fn bench_construction(group: &mut BenchmarkGroup<WallTime>, sizes: &[usize]) {
    group.sample_size(10);
    for &n in sizes {
        let patterns = WORDS[..n].iter().copied().collect_vec();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("standard", n), &n, |b, _| {
            b.iter(|| criterion::black_box(AhoCorasick::new(patterns.clone())));
        });
    }
}

fn perform_benches(c: &mut Criterion) {
    let text = haystack(1 << 16);
    let sizes = [1, 8, 32, WORDS.len()];

    let mut group = c.benchmark_group("Matching");
    bench_matching(&mut group, &text, &sizes);
    group.finish();

    let mut group = c.benchmark_group("Construction");
    bench_construction(&mut group, &sizes);
    group.finish();
}

criterion_group!(benches, perform_benches);
criterion_main!(benches);
