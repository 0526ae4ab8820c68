//! Built-in English → Korean breed labels, in classifier output order.

pub const DEFAULT_BREED_LABELS: &[(&str, &str)] = &[
    ("Chihuahua", "치와와"),
    ("Japanese Spaniel", "재패니즈 스패니얼"),
    ("Maltese", "말티즈"),
    ("Pekingese", "페키니즈"),
    ("Shih-Tzu", "시츄"),
    ("Papillon", "파피용"),
    ("Beagle", "비글"),
    ("Dachshund", "닥스훈트"),
    ("Italian Greyhound", "이탈리안 그레이하운드"),
    ("Whippet", "휘핏"),
    ("Yorkshire Terrier", "요크셔 테리어"),
    ("Jack Russell Terrier", "잭 러셀 테리어"),
    ("Miniature Schnauzer", "미니어처 슈나우저"),
    ("Golden Retriever", "골든 리트리버"),
    ("Labrador Retriever", "래브라도 리트리버"),
    ("Cocker Spaniel", "코커 스패니얼"),
    ("Shetland Sheepdog", "셔틀랜드 쉽독"),
    ("Border Collie", "보더 콜리"),
    ("German Shepherd", "저먼 셰퍼드"),
    ("Welsh Corgi", "웰시 코기"),
    ("Siberian Husky", "시베리안 허스키"),
    ("Alaskan Malamute", "알래스칸 말라뮤트"),
    ("Samoyed", "사모예드"),
    ("Pomeranian", "포메라니안"),
    ("Chow Chow", "차우차우"),
    ("Shiba Inu", "시바견"),
    ("Jindo", "진돗개"),
    ("Toy Poodle", "토이 푸들"),
    ("Miniature Poodle", "미니어처 푸들"),
    ("Standard Poodle", "스탠더드 푸들"),
    ("Bichon Frise", "비숑 프리제"),
    ("French Bulldog", "프렌치 불독"),
    ("Pug", "퍼그"),
    ("Boston Terrier", "보스턴 테리어"),
    ("Bernese Mountain Dog", "버니즈 마운틴 독"),
    ("Great Pyrenees", "그레이트 피레니즈"),
];

pub fn default_labels() -> Vec<(String, String)> {
    DEFAULT_BREED_LABELS
        .iter()
        .map(|(en, ko)| (en.to_string(), ko.to_string()))
        .collect()
}
