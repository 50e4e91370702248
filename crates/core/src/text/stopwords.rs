use std::collections::HashSet;
use std::sync::OnceLock;

/// Portuguese stopword list (NLTK corpus, verbatim, accents included).
///
/// Entries are kept exactly as published. Tokens are compared after normalization, so
/// accented entries such as `não` never match a normalized `nao`.
const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às",
    "até", "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do",
    "dos", "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "éramos",
    "essa", "essas", "esse", "esses", "esta", "está", "estamos", "estão", "estar", "estas",
    "estava", "estavam", "estávamos", "este", "esteja", "estejam", "estejamos", "estes",
    "esteve", "estive", "estivemos", "estiver", "estivera", "estiveram", "estivéramos",
    "estiverem", "estivermos", "estivesse", "estivessem", "estivéssemos", "estou", "eu", "foi",
    "fomos", "for", "fora", "foram", "fôramos", "forem", "formos", "fosse", "fossem",
    "fôssemos", "fui", "há", "haja", "hajam", "hajamos", "hão", "havemos", "haver", "hei",
    "houve", "houvemos", "houver", "houvera", "houverá", "houveram", "houvéramos", "houverão",
    "houverei", "houverem", "houveremos", "houveria", "houveriam", "houveríamos", "houvermos",
    "houvesse", "houvessem", "houvéssemos", "isso", "isto", "já", "lhe", "lhes", "mais", "mas",
    "me", "mesmo", "meu", "meus", "minha", "minhas", "muito", "na", "não", "nas", "nem", "no",
    "nos", "nós", "nossa", "nossas", "nosso", "nossos", "num", "numa", "o", "os", "ou", "para",
    "pela", "pelas", "pelo", "pelos", "por", "qual", "quando", "que", "quem", "são", "se",
    "seja", "sejam", "sejamos", "sem", "ser", "será", "serão", "serei", "seremos", "seria",
    "seriam", "seríamos", "seu", "seus", "só", "somos", "sou", "sua", "suas", "também", "te",
    "tem", "tém", "temos", "tenha", "tenham", "tenhamos", "tenho", "terá", "terão", "terei",
    "teremos", "teria", "teriam", "teríamos", "teu", "teus", "teve", "tinha", "tinham",
    "tínhamos", "tive", "tivemos", "tiver", "tivera", "tiveram", "tivéramos", "tiverem",
    "tivermos", "tivesse", "tivessem", "tivéssemos", "tu", "tua", "tuas", "um", "uma", "você",
    "vocês", "vos",
];

static STOPWORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Process-wide stopword set, built on first use.
pub fn stopwords() -> &'static HashSet<&'static str> {
    STOPWORDS.get_or_init(|| PORTUGUESE_STOPWORDS.iter().copied().collect())
}

pub fn is_stopword(token: &str) -> bool {
    stopwords().contains(token)
}
