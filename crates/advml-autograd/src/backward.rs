//! Backward Pass - Gradient Computation
//!
//! Reverse-mode gradient propagation over recorded gradient functions, plus
//! finite-difference utilities for verifying analytical gradients.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use std::collections::{HashMap, HashSet};

use advml_tensor::Tensor;

use crate::grad_fn::{GradFn, GradFnId};
use crate::variable::Variable;

// =============================================================================
// Backward Function
// =============================================================================

/// Computes gradients for all leaf variables reachable from `output`.
///
/// Traverses the recorded gradient functions in reverse topological order,
/// computing and accumulating gradients along every path.
///
/// # Arguments
/// * `output` - The output variable (typically a scalar result)
/// * `grad_output` - The gradient of the result with respect to itself (typically 1.0)
pub fn backward(output: &Variable, grad_output: &Tensor<f32>) {
    let grad_fn = if let Some(gf) = output.grad_fn() {
        gf.clone()
    } else {
        // Leaf variable with no recorded history
        if output.is_leaf() && output.requires_grad() {
            output.accumulate_grad(grad_output);
        }
        return;
    };

    // Build the topological order of gradient functions
    let mut topo_order: Vec<GradFn> = Vec::new();
    let mut visited: HashSet<GradFnId> = HashSet::new();
    build_topo_order(&grad_fn, &mut topo_order, &mut visited);

    // Seed the gradient map with the output gradient
    let mut grad_map: HashMap<GradFnId, Tensor<f32>> = HashMap::new();
    grad_map.insert(grad_fn.id(), grad_output.clone());

    // Process nodes in reverse topological order
    for node in topo_order.iter().rev() {
        let grad = match grad_map.get(&node.id()) {
            Some(g) => g.clone(),
            None => continue, // No gradient reached this node
        };

        let input_grads = node.apply(&grad);

        for (i, maybe_next) in node.next_functions().iter().enumerate() {
            if let Some(next_fn) = maybe_next {
                if let Some(input_grad) = input_grads.get(i).and_then(Clone::clone) {
                    grad_map
                        .entry(next_fn.id())
                        .and_modify(|existing| {
                            *existing = existing.add(&input_grad).unwrap();
                        })
                        .or_insert(input_grad);
                }
            }
        }
    }
}

/// Builds the topological order of gradient functions using DFS.
fn build_topo_order(node: &GradFn, order: &mut Vec<GradFn>, visited: &mut HashSet<GradFnId>) {
    if !visited.insert(node.id()) {
        return;
    }

    for next in node.next_functions().iter().flatten() {
        build_topo_order(next, order, visited);
    }

    order.push(node.clone());
}

// =============================================================================
// Gradient Checking
// =============================================================================

/// Numerically estimates the gradient of `func` at `input` using central
/// differences.
///
/// `func` must map its input to a scalar variable.
pub fn numerical_gradient<F>(func: F, input: &Variable, eps: f32) -> Tensor<f32>
where
    F: Fn(&Variable) -> Variable,
{
    let input_data = input.data();
    let mut grad_data = vec![0.0f32; input_data.numel()];

    for i in 0..input_data.numel() {
        let mut plus_data = input_data.to_vec();
        plus_data[i] += eps;
        let plus_input =
            Variable::from_tensor(Tensor::from_vec(plus_data, input_data.shape()).unwrap());
        let plus_val = func(&plus_input).data().to_vec()[0];

        let mut minus_data = input_data.to_vec();
        minus_data[i] -= eps;
        let minus_input =
            Variable::from_tensor(Tensor::from_vec(minus_data, input_data.shape()).unwrap());
        let minus_val = func(&minus_input).data().to_vec()[0];

        grad_data[i] = (plus_val - minus_val) / (2.0 * eps);
    }

    Tensor::from_vec(grad_data, input_data.shape()).unwrap()
}

/// Checks whether analytical and numerical gradients match within tolerance.
#[must_use]
pub fn gradcheck(analytical: &Tensor<f32>, numerical: &Tensor<f32>, rtol: f32, atol: f32) -> bool {
    if analytical.shape() != numerical.shape() {
        return false;
    }

    let a = analytical.to_vec();
    let n = numerical.to_vec();

    for (&av, &nv) in a.iter().zip(n.iter()) {
        let diff = (av - nv).abs();
        let tol = atol + rtol * nv.abs();
        if diff > tol {
            return false;
        }
    }

    true
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_backward() {
        // y = x^2, dy/dx = 2x
        let x = Variable::new(Tensor::from_vec(vec![3.0], &[1]).unwrap(), true);
        let y = x.pow(2.0).sum();

        y.backward();

        assert_abs_diff_eq!(x.grad().unwrap().to_vec()[0], 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_chain_backward() {
        // y = (x^2)^2 = x^4, dy/dx = 4x^3
        let x = Variable::new(Tensor::from_vec(vec![2.0], &[1]).unwrap(), true);
        let y = x.pow(2.0).pow(2.0).sum();

        y.backward();

        assert_abs_diff_eq!(x.grad().unwrap().to_vec()[0], 32.0, epsilon = 1e-4);
    }

    #[test]
    fn test_add_backward() {
        let a = Variable::new(Tensor::from_vec(vec![2.0], &[1]).unwrap(), true);
        let b = Variable::new(Tensor::from_vec(vec![3.0], &[1]).unwrap(), true);
        let loss = (&a + &b).sum();

        loss.backward();

        assert_abs_diff_eq!(a.grad().unwrap().to_vec()[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.grad().unwrap().to_vec()[0], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mul_backward() {
        let a = Variable::new(Tensor::from_vec(vec![2.0], &[1]).unwrap(), true);
        let b = Variable::new(Tensor::from_vec(vec![3.0], &[1]).unwrap(), true);
        let loss = (&a * &b).sum();

        loss.backward();

        assert_abs_diff_eq!(a.grad().unwrap().to_vec()[0], 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.grad().unwrap().to_vec()[0], 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_shared_input_accumulates() {
        // y = x * x, dy/dx = 2x
        let x = Variable::new(Tensor::from_vec(vec![3.0], &[1]).unwrap(), true);
        let y = (&x * &x).sum();

        y.backward();

        assert_abs_diff_eq!(x.grad().unwrap().to_vec()[0], 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_matmul_gradcheck() {
        let w = Variable::new(
            Tensor::from_vec(vec![0.5, -0.3, 0.8, 0.1], &[2, 2]).unwrap(),
            true,
        );
        let x = Variable::new(Tensor::from_vec(vec![1.0, 2.0], &[1, 2]).unwrap(), false);

        let loss = x.matmul(&w).sum();
        loss.backward();

        let numerical = numerical_gradient(
            |v| Variable::from_tensor(x.data()).matmul(v).sum(),
            &w,
            1e-3,
        );

        assert!(gradcheck(&w.grad().unwrap(), &numerical, 1e-2, 1e-3));
    }

    #[test]
    fn test_activation_gradcheck() {
        let x = Variable::new(
            Tensor::from_vec(vec![-1.5, -0.3, 0.4, 2.0], &[4]).unwrap(),
            true,
        );

        let loss = x.leaky_relu(0.2).sum();
        loss.backward();

        let numerical = numerical_gradient(|v| v.leaky_relu(0.2).sum(), &x, 1e-3);
        assert!(gradcheck(&x.grad().unwrap(), &numerical, 1e-2, 1e-3));
    }

    #[test]
    fn test_tanh_gradcheck() {
        let x = Variable::new(Tensor::from_vec(vec![-0.8, 0.2, 1.1], &[3]).unwrap(), true);

        let loss = x.tanh().sum();
        loss.backward();

        let numerical = numerical_gradient(|v| v.tanh().sum(), &x, 1e-3);
        assert!(gradcheck(&x.grad().unwrap(), &numerical, 1e-2, 1e-3));
    }

    #[test]
    fn test_sigmoid_gradcheck() {
        let x = Variable::new(Tensor::from_vec(vec![-1.0, 0.0, 1.0], &[3]).unwrap(), true);

        let loss = x.sigmoid().sum();
        loss.backward();

        let numerical = numerical_gradient(|v| v.sigmoid().sum(), &x, 1e-3);
        assert!(gradcheck(&x.grad().unwrap(), &numerical, 1e-2, 1e-3));
    }

    #[test]
    fn test_gradcheck_tolerance() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = Tensor::from_vec(vec![1.001, 2.001, 3.001], &[3]).unwrap();

        assert!(gradcheck(&a, &b, 0.01, 0.01));
        assert!(!gradcheck(&a, &b, 0.0001, 0.0001));
    }

    #[test]
    fn test_repeated_backward_accumulates() {
        let x = Variable::new(Tensor::from_vec(vec![1.0], &[1]).unwrap(), true);

        let y1 = x.mul_scalar(2.0).sum();
        y1.backward();
        let y2 = x.mul_scalar(2.0).sum();
        y2.backward();

        assert_abs_diff_eq!(x.grad().unwrap().to_vec()[0], 4.0, epsilon = 1e-5);

        x.zero_grad();
        assert!(x.grad().is_none());
    }
}
