use log::info;

use ngrams_core::io::read_corpus;
use ngrams_core::model::index::Index;
use ngrams_core::Error;

/// Used when the "data" directory holds no text.
const FALLBACK: [&str; 3] = [
    "to be or not to be, that is the question.",
    "be or not to be something, what is the question?",
    "what can we be, or not be, if we ask the question of ourselves.",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Index trigrams (n = 3) with the in-memory store and default tokenizer
    let index = Index::new(3);

    // Learn every .txt file of the "data" directory, one text per file,
    // in parallel. Falls back to a few lines of Hamlet
    let texts: Vec<String> = match read_corpus("./data") {
        Ok(texts) if !texts.is_empty() => texts,
        _ => FALLBACK.iter().map(|text| text.to_string()).collect(),
    };
    let tokens = index.parse_all(&texts)?;
    info!("Learned {} tokens, {} windows", tokens, index.store().len()?);

    // Look a window up: what follows "to be", and how often
    if let Some(result) = index.seek("to be")? {
        for (token, count) in result.next.iter() {
            println!("'to be' -> '{}' ({} times)", token, count);
        }
    }

    // Babble 10 texts of 50 tokens, the first ones from a seed
    println!("{}", index.babble("to be", 50)?);
    for i in 0..10 {
        println!("Generated text {}: {}", i + 1, index.babble("", 50)?);
    }

    // Babbling before learning anything fails with a dedicated error
    match Index::new(3).babble("", 10) {
        Err(Error::EmptyIndex) => println!("An empty index can't babble"),
        _ => println!("Should not happen"),
    }

    index.close()?;
    Ok(())
}
