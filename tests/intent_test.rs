use attendance_insights::{ClassifierError, Intent, IntentClassifier};
use strum::IntoEnumIterator;

#[test]
fn test_training_examples_classify_to_their_intent() -> Result<(), ClassifierError> {
    let classifier = IntentClassifier::new()?;
    for intent in Intent::iter() {
        for example in intent.training_examples() {
            assert_eq!(
                classifier.classify(example)?,
                intent,
                "example {:?} was misclassified",
                example
            );
        }
    }
    Ok(())
}

#[test]
fn test_usage_examples_are_understood() -> Result<(), ClassifierError> {
    let classifier = IntentClassifier::new()?;
    assert_eq!(
        classifier.classify("What is the average attendance by Employee Peer rating?")?,
        Intent::PeerRatingAttendance
    );
    assert_eq!(
        classifier.classify("Which department has the heighest attendance?")?,
        Intent::DepartmentAttendance
    );
    assert_eq!(classifier.classify("Show attendance by roles.")?, Intent::JobRoleAttendance);
    Ok(())
}

#[test]
fn test_out_of_domain_query_is_forced_into_an_intent() -> Result<(), ClassifierError> {
    let classifier = IntentClassifier::new()?;
    let prediction = classifier.predict("What's the weather today?")?;

    // "what" and "the" are shared with the training examples
    assert_eq!(prediction.known_tokens, 2);
    assert_eq!(prediction.intent(), Some(Intent::OverallAttendance));
    assert!(prediction.confidence < 0.5);
    Ok(())
}

#[test]
fn test_training_is_deterministic() -> Result<(), ClassifierError> {
    let first = IntentClassifier::new()?;
    let second = IntentClassifier::new()?;
    for query in ["Attendance overview", "peer rating", "What's the weather today?"] {
        assert_eq!(first.predict(query)?, second.predict(query)?);
    }
    Ok(())
}

#[test]
fn test_scores_cover_every_intent() -> Result<(), ClassifierError> {
    let classifier = IntentClassifier::new()?;
    let prediction = classifier.predict("attendance by job role")?;
    let labels: Vec<&str> = prediction.scores.iter().map(|(l, _)| l.as_str()).collect();
    let expected: Vec<&str> = Intent::iter().map(Intent::label).collect();
    assert_eq!(labels, expected);

    let total: f64 = prediction.scores.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_classifier_converges_on_training_set() -> Result<(), ClassifierError> {
    let info = IntentClassifier::new()?.classifier().info();
    assert_eq!(info.num_classes, 4);
    assert_eq!(info.vocabulary_size, 27);
    assert!(info.converged);
    Ok(())
}
